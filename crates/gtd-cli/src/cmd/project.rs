use super::{choose_project, load_store, save_store};
use crate::output::{format_time, print_json, print_table, short_id};
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use gtd_core::{
    config::Config,
    project::{self as project_ops, ProjectDraft},
    store::Store,
};
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// Create a project
    Create {
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        notes: String,
        /// Parent project id or id prefix
        #[arg(long)]
        parent: Option<String>,
        /// Parent by its rank in `project popular` (1 = most popular)
        #[arg(long, value_name = "N", conflicts_with = "parent")]
        pick: Option<usize>,
    },
    /// List active projects with their open action counts
    List,
    /// Edit project fields; omitted flags keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Parent project id or id prefix
        #[arg(long)]
        parent: Option<String>,
        /// Parent by its rank among the other popular projects (1 = most popular)
        #[arg(long, value_name = "N", conflicts_with = "parent")]
        pick: Option<usize>,
        /// Make this a top-level project
        #[arg(long, conflicts_with_all = ["parent", "pick"])]
        no_parent: bool,
    },
    /// Mark a project completed (refused while it has open actions)
    Complete { id: String },
    /// Reopen a completed project
    Uncomplete { id: String },
    /// Archive a project (refused while it has actions or sub-projects)
    Archive { id: String },
    /// Restore an archived project
    Unarchive { id: String },
    /// Delete a project (refused while it has actions or sub-projects)
    Delete { id: String },
    /// Show the quick-pick list of most popular active projects
    Popular {
        /// Number of projects to show (default: ranking.quick_picks from config)
        #[arg(long)]
        top: Option<usize>,
        /// Include the scoring breakdown
        #[arg(long)]
        scores: bool,
    },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::Create {
            title,
            description,
            notes,
            parent,
            pick,
        } => {
            let mut store = load_store(root)?;
            let parent_project_id = choose_project(root, &store, parent.as_deref(), pick, None)?;
            let draft = ProjectDraft {
                title: title.join(" "),
                description,
                notes,
                parent_project_id,
            };
            create(root, &mut store, draft, json)
        }
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Edit {
            id,
            title,
            description,
            notes,
            parent,
            pick,
            no_parent,
        } => {
            let mut store = load_store(root)?;
            let project_id = store.resolve_project_id(&id)?;
            let current = store
                .project(project_id)
                .with_context(|| format!("project '{id}' not found"))?
                .clone();
            let parent_project_id = if no_parent {
                None
            } else if parent.is_some() || pick.is_some() {
                choose_project(root, &store, parent.as_deref(), pick, Some(project_id))?
            } else {
                current.parent_project_id
            };
            let draft = ProjectDraft {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                notes: notes.unwrap_or(current.notes),
                parent_project_id,
            };
            store
                .edit_project(project_id, draft)
                .with_context(|| format!("cannot edit project '{id}'"))?;
            save_store(root, &store)?;

            if json {
                print_json(&serde_json::json!({ "id": project_id, "updated": true }))?;
            } else {
                println!("Updated project [{}]", short_id(project_id));
            }
            Ok(())
        }
        ProjectSubcommand::Complete { id } => transition(root, &id, "completed", json, |s, id| {
            s.complete_project(id, Utc::now())
        }),
        ProjectSubcommand::Uncomplete { id } => {
            transition(root, &id, "reopened", json, |s, id| s.uncomplete_project(id))
        }
        ProjectSubcommand::Archive { id } => transition(root, &id, "archived", json, |s, id| {
            s.archive_project(id, Utc::now())
        }),
        ProjectSubcommand::Unarchive { id } => {
            transition(root, &id, "unarchived", json, |s, id| s.unarchive_project(id))
        }
        ProjectSubcommand::Delete { id } => {
            transition(root, &id, "deleted", json, |s, id| s.delete_project(id))
        }
        ProjectSubcommand::Popular { top, scores } => popular(root, top, scores, json),
    }
}

fn create(root: &Path, store: &mut Store, draft: ProjectDraft, json: bool) -> anyhow::Result<()> {
    let title = draft.title.trim().to_string();
    let id = store.create_project(draft, Utc::now())?;
    save_store(root, store)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "title": title }))?;
    } else {
        println!("Created project [{}]: {title}", short_id(id));
    }
    Ok(())
}

fn transition(
    root: &Path,
    id: &str,
    verb: &str,
    json: bool,
    apply: impl FnOnce(&mut Store, Uuid) -> gtd_core::Result<()>,
) -> anyhow::Result<()> {
    let mut store = load_store(root)?;
    let project_id = store.resolve_project_id(id)?;
    apply(&mut store, project_id)
        .with_context(|| format!("project '{id}' could not be {verb}"))?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": project_id, "status": verb }))?;
    } else {
        println!("Project [{}] {verb}", short_id(project_id));
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let active = project_ops::active_projects(&store.projects);

    let open_count = |id: Uuid| {
        store
            .actions
            .iter()
            .filter(|a| a.project_id == Some(id) && a.is_open())
            .count()
    };

    if json {
        let items: Vec<_> = active
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "title": p.title,
                    "parent_project_id": p.parent_project_id,
                    "created_at": p.created_at,
                    "open_actions": open_count(p.id),
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }
    if active.is_empty() {
        println!("No active projects.");
        return Ok(());
    }

    let rows = active
        .iter()
        .map(|p| {
            let parent = p
                .parent_project_id
                .and_then(|id| store.project(id))
                .map(|parent| parent.title.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![
                short_id(p.id),
                p.title.clone(),
                open_count(p.id).to_string(),
                parent,
                format_time(p.created_at),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "OPEN", "PARENT", "CREATED"], rows);
    Ok(())
}

fn popular(root: &Path, top: Option<usize>, scores: bool, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let top = match top {
        Some(n) => n,
        None => Config::load(root).context("failed to load config")?.ranking.quick_picks,
    };
    // One timestamp for the whole ranking pass.
    let now = Utc::now();

    if scores {
        let mut stats = store.project_scores(now);
        stats.truncate(top);
        if json {
            print_json(&stats)?;
            return Ok(());
        }
        let rows = stats
            .iter()
            .map(|s| {
                vec![
                    short_id(s.id),
                    s.title.clone(),
                    format!("{:.3}", s.score),
                    format!("{}/{}", s.completed_actions, s.total_actions),
                    s.days_since_last_activity.to_string(),
                ]
            })
            .collect();
        print_table(&["ID", "TITLE", "SCORE", "DONE", "IDLE DAYS"], rows);
        return Ok(());
    }

    let picks = store.popular_projects(top, now);
    if json {
        print_json(&picks)?;
        return Ok(());
    }
    if picks.is_empty() {
        println!("No active projects.");
        return Ok(());
    }
    for (i, pick) in picks.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, pick.title, short_id(pick.id));
    }
    Ok(())
}

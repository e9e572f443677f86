use super::{choose_project, load_store, parse_deadline, save_store};
use crate::output::{format_time, print_json, print_table, short_id};
use anyhow::Context;
use chrono::Utc;
use clap::{Args, Subcommand};
use gtd_core::{
    action::{self as action_ops, ActionDraft},
    store::Store,
    types::ActionType,
};
use std::path::Path;
use uuid::Uuid;

#[derive(Subcommand)]
pub enum ActionSubcommand {
    /// List open actions (now first, waiting-for last, then by deadline)
    List {
        /// Only actions belonging to this project
        #[arg(long)]
        project: Option<String>,
    },
    /// Add an action directly, skipping the inbox
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        #[command(flatten)]
        fields: ActionFields,
    },
    /// Edit action fields; omitted flags keep their current value
    Edit {
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: ActionFields,
        /// Remove the deadline
        #[arg(long, conflicts_with = "deadline")]
        no_deadline: bool,
        /// Detach from its project
        #[arg(long, conflicts_with_all = ["project", "pick"])]
        no_project: bool,
    },
    /// Mark an action completed
    Complete { id: String },
    /// Reopen a completed action
    Uncomplete { id: String },
    /// Archive an action
    Archive { id: String },
    /// Restore an archived action
    Unarchive { id: String },
    /// Delete an action permanently
    Delete { id: String },
}

#[derive(Args)]
pub struct ActionFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    notes: Option<String>,
    /// Deadline: YYYY-MM-DD, "YYYY-MM-DD HH:MM", or RFC 3339
    #[arg(long)]
    deadline: Option<String>,
    /// Project id or id prefix
    #[arg(long)]
    project: Option<String>,
    /// Project by its rank in `project popular` (1 = most popular)
    #[arg(long, value_name = "N", conflicts_with = "project")]
    pick: Option<usize>,
    /// Action type: nothing, now, waiting_for
    #[arg(long = "type", value_name = "TYPE")]
    action_type: Option<ActionType>,
}

pub fn run(root: &Path, subcmd: ActionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ActionSubcommand::List { project } => list(root, project.as_deref(), json),
        ActionSubcommand::Add { title, fields } => add(root, &title.join(" "), fields, json),
        ActionSubcommand::Edit {
            id,
            title,
            fields,
            no_deadline,
            no_project,
        } => edit(root, &id, title, fields, no_deadline, no_project, json),
        ActionSubcommand::Complete { id } => transition(root, &id, "completed", json, |s, id| {
            s.complete_action(id, Utc::now())
        }),
        ActionSubcommand::Uncomplete { id } => {
            transition(root, &id, "reopened", json, |s, id| s.uncomplete_action(id))
        }
        ActionSubcommand::Archive { id } => transition(root, &id, "archived", json, |s, id| {
            s.archive_action(id, Utc::now())
        }),
        ActionSubcommand::Unarchive { id } => {
            transition(root, &id, "unarchived", json, |s, id| s.unarchive_action(id))
        }
        ActionSubcommand::Delete { id } => {
            transition(root, &id, "deleted", json, |s, id| s.delete_action(id))
        }
    }
}

fn add(root: &Path, title: &str, fields: ActionFields, json: bool) -> anyhow::Result<()> {
    let mut store = load_store(root)?;
    let draft = ActionDraft {
        title: title.to_string(),
        description: fields.description.unwrap_or_default(),
        notes: fields.notes.unwrap_or_default(),
        deadline: fields.deadline.as_deref().map(parse_deadline).transpose()?,
        project_id: choose_project(root, &store, fields.project.as_deref(), fields.pick, None)?,
        action_type: fields.action_type.unwrap_or_default(),
    };
    let id = store.add_action(draft, Utc::now())?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "title": title.trim() }))?;
    } else {
        println!("Added action [{}]: {}", short_id(id), title.trim());
    }
    Ok(())
}

fn edit(
    root: &Path,
    id: &str,
    title: Option<String>,
    fields: ActionFields,
    no_deadline: bool,
    no_project: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut store = load_store(root)?;
    let action_id = store.resolve_action_id(id)?;
    let current = store
        .action(action_id)
        .with_context(|| format!("action '{id}' not found"))?
        .clone();

    let deadline = if no_deadline {
        None
    } else if let Some(d) = fields.deadline.as_deref() {
        Some(parse_deadline(d)?)
    } else {
        current.deadline
    };
    let project_id = if no_project {
        None
    } else if fields.project.is_some() || fields.pick.is_some() {
        choose_project(root, &store, fields.project.as_deref(), fields.pick, None)?
    } else {
        current.project_id
    };

    let draft = ActionDraft {
        title: title.unwrap_or(current.title),
        description: fields.description.unwrap_or(current.description),
        notes: fields.notes.unwrap_or(current.notes),
        deadline,
        project_id,
        action_type: fields.action_type.unwrap_or(current.action_type),
    };
    store
        .edit_action(action_id, draft)
        .with_context(|| format!("cannot edit action '{id}'"))?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": action_id, "updated": true }))?;
    } else {
        println!("Updated action [{}]", short_id(action_id));
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
    let action_id = store.resolve_action_id(id)?;
    apply(&mut store, action_id)
        .with_context(|| format!("action '{id}' could not be {verb}"))?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": action_id, "status": verb }))?;
    } else {
        println!("Action [{}] {verb}", short_id(action_id));
    }
    Ok(())
}

fn list(root: &Path, project: Option<&str>, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let project_id = choose_project(root, &store, project, None, None)?;
    let open: Vec<_> = action_ops::open_actions(&store.actions)
        .into_iter()
        .filter(|a| project_id.is_none() || a.project_id == project_id)
        .collect();

    if json {
        print_json(&open)?;
        return Ok(());
    }
    if open.is_empty() {
        println!("No open actions.");
        return Ok(());
    }

    let now = Utc::now();
    let rows = open
        .iter()
        .map(|a| {
            let title = match a.action_type.label() {
                "" => a.title.clone(),
                label => format!("{label} {}", a.title),
            };
            let deadline = match a.deadline {
                Some(d) if a.is_overdue(now) => format!("{} (overdue)", format_time(d)),
                Some(d) => format_time(d),
                None => "-".to_string(),
            };
            let project = a
                .project_id
                .and_then(|p| store.project(p))
                .map(|p| p.title.clone())
                .unwrap_or_else(|| "-".to_string());
            vec![short_id(a.id), title, deadline, project]
        })
        .collect();
    print_table(&["ID", "TITLE", "DEADLINE", "PROJECT"], rows);
    Ok(())
}

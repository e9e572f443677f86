use super::{choose_project, load_store, parse_deadline, save_store};
use crate::output::{format_time, print_json, print_table, short_id};
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use gtd_core::{action::ActionDraft, inbox, project::ProjectDraft, types::ActionType};
use std::path::Path;

#[derive(Subcommand)]
pub enum InSubcommand {
    /// Capture a note
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List ins waiting for triage
    List,
    /// Delete an in without triaging it
    Delete { id: String },
    /// Turn an in into an action
    ToAction {
        id: String,
        /// Action title (defaults to the in's text)
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Notes (defaults to the in's text)
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
        #[arg(long = "type", value_name = "TYPE", default_value = "nothing")]
        action_type: ActionType,
    },
    /// Turn an in into a project
    ToProject {
        id: String,
        /// Project title (defaults to the in's text)
        #[arg(long)]
        title: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        /// Notes (defaults to the in's text)
        #[arg(long)]
        notes: Option<String>,
        /// Parent project id or id prefix
        #[arg(long)]
        parent: Option<String>,
        /// Parent by its rank in `project popular` (1 = most popular)
        #[arg(long, value_name = "N", conflicts_with = "parent")]
        pick: Option<usize>,
    },
}

pub fn run(root: &Path, subcmd: InSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        InSubcommand::Add { text } => add(root, &text.join(" "), json),
        InSubcommand::List => list(root, json),
        InSubcommand::Delete { id } => delete(root, &id, json),
        InSubcommand::ToAction {
            id,
            title,
            description,
            notes,
            deadline,
            project,
            pick,
            action_type,
        } => {
            let mut store = load_store(root)?;
            let in_id = store.resolve_in_id(&id)?;
            let text = in_text(&store, in_id);
            let draft = ActionDraft {
                title: title.unwrap_or_default(),
                description,
                notes: notes.unwrap_or(text),
                deadline: deadline.as_deref().map(parse_deadline).transpose()?,
                project_id: choose_project(root, &store, project.as_deref(), pick, None)?,
                action_type,
            };
            let action_id = store
                .move_in_to_action(in_id, draft, Utc::now())
                .with_context(|| format!("cannot move in '{id}'"))?;
            save_store(root, &store)?;
            report_move(json, &id, "action", action_id)
        }
        InSubcommand::ToProject {
            id,
            title,
            description,
            notes,
            parent,
            pick,
        } => {
            let mut store = load_store(root)?;
            let in_id = store.resolve_in_id(&id)?;
            let text = in_text(&store, in_id);
            let draft = ProjectDraft {
                title: title.unwrap_or_default(),
                description,
                notes: notes.unwrap_or(text),
                parent_project_id: choose_project(root, &store, parent.as_deref(), pick, None)?,
            };
            let project_id = store
                .move_in_to_project(in_id, draft, Utc::now())
                .with_context(|| format!("cannot move in '{id}'"))?;
            save_store(root, &store)?;
            report_move(json, &id, "project", project_id)
        }
    }
}

fn in_text(store: &gtd_core::store::Store, id: uuid::Uuid) -> String {
    store
        .ins
        .iter()
        .find(|i| i.id == id)
        .map(|i| i.text.clone())
        .unwrap_or_default()
}

fn report_move(json: bool, in_id: &str, kind: &str, new_id: uuid::Uuid) -> anyhow::Result<()> {
    if json {
        print_json(&serde_json::json!({ "in": in_id, "kind": kind, "id": new_id }))?;
    } else {
        println!("Moved in [{in_id}] to {kind} [{}]", short_id(new_id));
    }
    Ok(())
}

fn add(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let mut store = load_store(root)?;
    let id = store.add_in(text, Utc::now())?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": id, "text": text.trim() }))?;
    } else {
        println!("Captured [{}]", short_id(id));
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let pending = inbox::pending(&store.ins);

    if json {
        print_json(&pending)?;
        return Ok(());
    }
    if pending.is_empty() {
        println!("Inbox empty.");
        return Ok(());
    }
    let rows = pending
        .iter()
        .map(|i| vec![short_id(i.id), format_time(i.created_at), i.text.clone()])
        .collect();
    print_table(&["ID", "CAPTURED", "TEXT"], rows);
    Ok(())
}

fn delete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let mut store = load_store(root)?;
    let in_id = store.resolve_in_id(id)?;
    store.delete_in(in_id)?;
    save_store(root, &store)?;

    if json {
        print_json(&serde_json::json!({ "id": in_id, "deleted": true }))?;
    } else {
        println!("Deleted in [{}]", short_id(in_id));
    }
    Ok(())
}

use super::load_store;
use crate::output::{format_time, print_json, print_table, short_id};
use chrono::Local;
use gtd_core::history::{self, HistoryItem};
use std::path::Path;

/// Completed actions and projects, grouped by local day.
pub fn completed(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let days = history::completed_by_day(&store, &Local);

    if json {
        return print_json(&days);
    }
    if days.is_empty() {
        println!("Nothing completed yet.");
        return Ok(());
    }
    for day in &days {
        println!("{}", day.date.format("%a %b %-d, %Y"));
        for item in &day.items {
            println!(
                "  {} {:<8} {} [{}]",
                item.at.with_timezone(&Local).format("%H:%M"),
                item.kind,
                item.title,
                short_id(item.id)
            );
        }
    }
    Ok(())
}

/// Archived projects and actions.
pub fn archived(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let listing = history::archived(&store);

    if json {
        return print_json(&listing);
    }
    if listing.projects.is_empty() && listing.actions.is_empty() {
        println!("Archive empty.");
        return Ok(());
    }
    if !listing.projects.is_empty() {
        println!("PROJECTS");
        print_table(&["ID", "TITLE", "ARCHIVED"], rows(&listing.projects));
        println!();
    }
    if !listing.actions.is_empty() {
        println!("ACTIONS");
        print_table(&["ID", "TITLE", "ARCHIVED"], rows(&listing.actions));
    }
    Ok(())
}

fn rows(items: &[HistoryItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|i| vec![short_id(i.id), i.title.clone(), format_time(i.at)])
        .collect()
}

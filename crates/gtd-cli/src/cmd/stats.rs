use super::load_store;
use crate::output::print_json;
use chrono::Local;
use gtd_core::stats::Summary;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let store = load_store(root)?;
    let summary = Summary::compute(&store, &Local::now());

    if json {
        return print_json(&summary);
    }

    println!("active: {}", summary.active);
    println!(
        "completed: {} (today: {})",
        summary.completed, summary.completed_today
    );
    println!();
    println!("  Inbox          {}", summary.pending_ins);
    println!("  Open actions   {}", summary.open_actions);
    println!("  Overdue        {}", summary.overdue_actions);
    println!("  Projects       {}", summary.active_projects);
    println!("  Archived       {}", summary.archived);
    Ok(())
}

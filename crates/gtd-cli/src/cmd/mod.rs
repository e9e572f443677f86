pub mod action;
pub mod config;
pub mod history;
pub mod inbox;
pub mod init;
pub mod project;
pub mod stats;

use anyhow::{bail, Context};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use gtd_core::{config::Config, store::Store};
use std::path::Path;
use uuid::Uuid;

pub(crate) fn load_store(root: &Path) -> anyhow::Result<Store> {
    Store::load(root).context("failed to load store")
}

pub(crate) fn save_store(root: &Path, store: &Store) -> anyhow::Result<()> {
    store.save(root).context("failed to save store")
}

/// Resolve a project given either by id prefix or by 1-based rank in the
/// configured quick-pick list. `exclude` is left out of the picks.
pub(crate) fn choose_project(
    root: &Path,
    store: &Store,
    prefix: Option<&str>,
    pick: Option<usize>,
    exclude: Option<Uuid>,
) -> anyhow::Result<Option<Uuid>> {
    if let Some(prefix) = prefix {
        return Ok(Some(store.resolve_project_id(prefix)?));
    }
    let Some(rank) = pick else {
        return Ok(None);
    };
    let top = Config::load(root)
        .context("failed to load config")?
        .ranking
        .quick_picks;
    let id = store.quick_pick(top, rank, exclude, Utc::now())?;
    tracing::debug!(rank, %id, "quick pick");
    Ok(Some(id))
}

/// Parse a deadline given as RFC 3339, `YYYY-MM-DD HH:MM` (local), or
/// `YYYY-MM-DD` (local end of day).
pub(crate) fn parse_deadline(input: &str) -> anyhow::Result<DateTime<Utc>> {
    parse_deadline_in(input, &Local)
}

fn parse_deadline_in<Tz: TimeZone>(input: &str, tz: &Tz) -> anyhow::Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        ndt
    } else if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        date.and_hms_opt(23, 59, 59)
            .with_context(|| format!("invalid deadline '{input}'"))?
    } else {
        bail!("invalid deadline '{input}': expected YYYY-MM-DD, 'YYYY-MM-DD HH:MM', or RFC 3339");
    };
    match tz.from_local_datetime(&naive).earliest() {
        Some(local) => Ok(local.with_timezone(&Utc)),
        None => bail!("deadline '{input}' does not exist in the local time zone"),
    }
}

use crate::store::Store;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// HistoryItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Action,
    Project,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemKind::Action => "action",
            ItemKind::Project => "project",
        };
        f.pad(s)
    }
}

/// An action or project together with the timestamp that placed it here.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub kind: ItemKind,
    pub id: Uuid,
    pub title: String,
    pub at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveListing {
    pub projects: Vec<HistoryItem>,
    pub actions: Vec<HistoryItem>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Completed actions and projects grouped by local completion date.
///
/// Newest day first; within a day, newest completion first.
pub fn completed_by_day<Tz: TimeZone>(store: &Store, tz: &Tz) -> Vec<DayGroup> {
    let actions = store.actions.iter().filter_map(|a| {
        a.completed.map(|at| HistoryItem {
            kind: ItemKind::Action,
            id: a.id,
            title: a.title.clone(),
            at,
            created_at: a.created_at,
        })
    });
    let projects = store.projects.iter().filter_map(|p| {
        p.completed.map(|at| HistoryItem {
            kind: ItemKind::Project,
            id: p.id,
            title: p.title.clone(),
            at,
            created_at: p.created_at,
        })
    });

    let mut days: BTreeMap<NaiveDate, Vec<HistoryItem>> = BTreeMap::new();
    for item in actions.chain(projects) {
        let date = item.at.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(item);
    }

    days.into_iter()
        .rev()
        .map(|(date, mut items)| {
            items.sort_by(|a, b| b.at.cmp(&a.at));
            DayGroup { date, items }
        })
        .collect()
}

/// Archived projects and actions, oldest archival first.
pub fn archived(store: &Store) -> ArchiveListing {
    let mut listing = ArchiveListing {
        projects: store
            .projects
            .iter()
            .filter_map(|p| {
                p.archived.map(|at| HistoryItem {
                    kind: ItemKind::Project,
                    id: p.id,
                    title: p.title.clone(),
                    at,
                    created_at: p.created_at,
                })
            })
            .collect(),
        actions: store
            .actions
            .iter()
            .filter_map(|a| {
                a.archived.map(|at| HistoryItem {
                    kind: ItemKind::Action,
                    id: a.id,
                    title: a.title.clone(),
                    at,
                    created_at: a.created_at,
                })
            })
            .collect(),
    };
    let by_archival =
        |a: &HistoryItem, b: &HistoryItem| a.at.cmp(&b.at).then(a.created_at.cmp(&b.created_at));
    listing.projects.sort_by(by_archival);
    listing.actions.sort_by(by_archival);
    listing
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::store::Store;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Open actions plus active projects.
    pub active: usize,
    /// Completed actions plus completed projects, all time.
    pub completed: usize,
    /// Completions whose local calendar day matches `now`.
    pub completed_today: usize,
    pub pending_ins: usize,
    pub open_actions: usize,
    pub overdue_actions: usize,
    pub active_projects: usize,
    pub archived: usize,
}

impl Summary {
    /// Count everything relative to `now`; "today" is taken in `now`'s time zone.
    pub fn compute<Tz: TimeZone>(store: &Store, now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let now_utc = now.with_timezone(&Utc);
        let is_today = |ts: &DateTime<Utc>| ts.with_timezone(&tz).date_naive() == today;

        let open_actions = store.actions.iter().filter(|a| a.is_open()).count();
        let active_projects = store.projects.iter().filter(|p| p.is_active()).count();

        let completions = store
            .actions
            .iter()
            .filter_map(|a| a.completed)
            .chain(store.projects.iter().filter_map(|p| p.completed));
        let (completed, completed_today) = completions.fold((0, 0), |(all, on_day), ts| {
            (all + 1, on_day + usize::from(is_today(&ts)))
        });

        Self {
            active: open_actions + active_projects,
            completed,
            completed_today,
            pending_ins: store.ins.iter().filter(|i| !i.moved).count(),
            open_actions,
            overdue_actions: store.actions.iter().filter(|a| a.is_overdue(now_utc)).count(),
            active_projects,
            archived: store.actions.iter().filter(|a| a.archived.is_some()).count()
                + store.projects.iter().filter(|p| p.archived.is_some()).count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDraft;
    use crate::project::ProjectDraft;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn empty_store_is_all_zero() {
        let summary = Summary::compute(&Store::new(), &Utc::now());
        assert_eq!(summary.active, 0);
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.completed_today, 0);
    }

    #[test]
    fn counts_active_completed_and_overdue() {
        let now = Utc.with_ymd_and_hms(2025, 4, 2, 15, 0, 0).unwrap();
        let mut store = Store::new();
        store.add_in("pending", now).unwrap();
        let project = store.create_project(ProjectDraft::titled("Trip"), now).unwrap();

        let mut late = ActionDraft::titled("book hotel");
        late.deadline = Some(now - Duration::hours(1));
        store.add_action(late, now - Duration::days(3)).unwrap();

        let done_today = store.add_action(ActionDraft::titled("pack"), now).unwrap();
        store.complete_action(done_today, now - Duration::hours(2)).unwrap();
        let done_before = store.add_action(ActionDraft::titled("visa"), now).unwrap();
        store.complete_action(done_before, now - Duration::days(2)).unwrap();

        let shelved = store.add_action(ActionDraft::titled("souvenirs"), now).unwrap();
        store.archive_action(shelved, now).unwrap();

        let summary = Summary::compute(&store, &now);
        assert_eq!(summary.pending_ins, 1);
        assert_eq!(summary.open_actions, 1);
        assert_eq!(summary.overdue_actions, 1);
        assert_eq!(summary.active_projects, 1);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.completed_today, 1);
        assert_eq!(summary.archived, 1);
        assert!(store.project(project).is_some());
    }

    #[test]
    fn today_follows_local_time_zone() {
        // 23:30 UTC on Apr 1 is already Apr 2 at UTC+2.
        let completed_at = Utc.with_ymd_and_hms(2025, 4, 1, 23, 30, 0).unwrap();
        let mut store = Store::new();
        let id = store.add_action(ActionDraft::titled("late night"), completed_at).unwrap();
        store.complete_action(id, completed_at).unwrap();

        let utc_now = Utc.with_ymd_and_hms(2025, 4, 2, 8, 0, 0).unwrap();
        assert_eq!(Summary::compute(&store, &utc_now).completed_today, 0);

        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let local_now = utc_now.with_timezone(&plus_two);
        assert_eq!(Summary::compute(&store, &local_now).completed_today, 1);
    }
}

//! Popularity ranking for the project quick-pick list.
//!
//! Scores each active project by how recently it saw activity, how much of
//! its work gets finished, and how many actions it carries, then returns the
//! highest scoring projects. The computation is pure: the caller supplies the
//! snapshot and the reference time.

use crate::action::Action;
use crate::project::Project;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Days over which the recency score decays by a factor of e.
pub const RECENCY_DECAY_DAYS: f64 = 35.0;
pub const ACTION_COUNT_WEIGHT: f64 = 0.5;
pub const COMPLETION_WEIGHT: f64 = 0.8;
pub const RECENCY_WEIGHT: f64 = 3.0;

const MILLIS_PER_DAY: i64 = 86_400_000;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickPick {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStats {
    pub id: Uuid,
    pub title: String,
    pub total_actions: usize,
    pub completed_actions: usize,
    pub days_since_last_activity: i64,
    pub score: f64,
}

impl From<ProjectStats> for QuickPick {
    fn from(stats: ProjectStats) -> Self {
        Self {
            id: stats.id,
            title: stats.title,
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Return the `top` most popular projects, best first.
///
/// `projects` is expected to hold only active projects. Actions that point at
/// a project outside that set are ignored. Projects with equal scores keep
/// their input order.
pub fn rank(
    projects: &[Project],
    actions: &[Action],
    top: usize,
    now: DateTime<Utc>,
) -> Vec<QuickPick> {
    let ranked: Vec<QuickPick> = score_projects(projects, actions, now)
        .into_iter()
        .take(top)
        .map(QuickPick::from)
        .collect();
    tracing::debug!(
        projects = projects.len(),
        actions = actions.len(),
        top,
        returned = ranked.len(),
        "ranked popular projects"
    );
    ranked
}

/// Score every project and sort by score, highest first (stable).
pub fn score_projects(
    projects: &[Project],
    actions: &[Action],
    now: DateTime<Utc>,
) -> Vec<ProjectStats> {
    let mut scored: Vec<ProjectStats> = group_by_project(projects, actions)
        .into_iter()
        .map(|(project, project_actions)| score_project(project, &project_actions, now))
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Pair each project with its actions in a single pass over `actions`.
///
/// Output order follows `projects`. Actions without a project, or whose
/// project is not in `projects`, are dropped.
pub fn group_by_project<'a>(
    projects: &'a [Project],
    actions: &'a [Action],
) -> Vec<(&'a Project, Vec<&'a Action>)> {
    let mut groups: Vec<(&Project, Vec<&Action>)> = Vec::with_capacity(projects.len());
    let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(projects.len());
    for project in projects {
        index.entry(project.id).or_insert_with(|| {
            groups.push((project, Vec::new()));
            groups.len() - 1
        });
    }

    for action in actions {
        let slot = action.project_id.and_then(|id| index.get(&id));
        if let Some(&slot) = slot {
            groups[slot].1.push(action);
        }
    }
    groups
}

pub fn score_project(
    project: &Project,
    actions: &[&Action],
    now: DateTime<Utc>,
) -> ProjectStats {
    let total_actions = actions.len();
    let completed_actions = actions.iter().filter(|a| a.completed.is_some()).count();
    let days = days_since(now, most_recent_activity(project, actions));

    ProjectStats {
        id: project.id,
        title: project.title.clone(),
        total_actions,
        completed_actions,
        days_since_last_activity: days,
        score: popularity_score(total_actions, completed_actions, days),
    }
}

/// Creation time of the action with the latest activity date, or the
/// project's creation time when it has no actions. Ties go to the later
/// action in the slice.
pub fn most_recent_activity(project: &Project, actions: &[&Action]) -> DateTime<Utc> {
    actions
        .iter()
        .copied()
        .reduce(|latest, current| {
            if current.activity_date() >= latest.activity_date() {
                current
            } else {
                latest
            }
        })
        .map(|a| a.created_at)
        .unwrap_or(project.created_at)
}

/// Whole days elapsed, rounded toward negative infinity. Timestamps in the
/// future give negative values.
pub fn days_since(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    (now - then).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn popularity_score(
    total_actions: usize,
    completed_actions: usize,
    days_since_last_activity: i64,
) -> f64 {
    let recency = (-(days_since_last_activity as f64) / RECENCY_DECAY_DAYS).exp();
    let completion_rate = if total_actions > 0 {
        completed_actions as f64 / total_actions as f64
    } else {
        0.0
    };
    let action_count = (total_actions.max(1) as f64).ln();

    action_count * ACTION_COUNT_WEIGHT
        + completion_rate * COMPLETION_WEIGHT
        + recency * RECENCY_WEIGHT
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDraft;
    use crate::project::ProjectDraft;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn project(title: &str, created: DateTime<Utc>) -> Project {
        Project::from_draft(ProjectDraft::titled(title), created).unwrap()
    }

    fn action(
        project: &Project,
        created: DateTime<Utc>,
        completed: Option<DateTime<Utc>>,
    ) -> Action {
        let mut draft = ActionDraft::titled("step");
        draft.project_id = Some(project.id);
        let mut a = Action::from_draft(draft, created).unwrap();
        a.completed = completed;
        a
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_inputs_give_empty_result() {
        assert!(rank(&[], &[], 6, now()).is_empty());
    }

    #[test]
    fn fresh_project_without_actions_scores_three() {
        let p = project("fresh", now());
        let stats = score_projects(&[p], &[], now());
        assert_eq!(stats[0].total_actions, 0);
        assert_eq!(stats[0].days_since_last_activity, 0);
        assert!(close(stats[0].score, 3.0));
    }

    #[test]
    fn fully_completed_busy_project_score() {
        let p = project("busy", now() - Duration::days(90));
        let actions: Vec<Action> = (0..10)
            .map(|_| {
                action(
                    &p,
                    now() - Duration::hours(3),
                    Some(now() - Duration::hours(1)),
                )
            })
            .collect();
        let stats = score_projects(&[p], &actions, now());
        assert_eq!(stats[0].total_actions, 10);
        assert_eq!(stats[0].completed_actions, 10);
        assert_eq!(stats[0].days_since_last_activity, 0);
        let expected = 10f64.ln() * 0.5 + 0.8 + 3.0;
        assert!(close(stats[0].score, expected));
        assert!((stats[0].score - 4.951).abs() < 1e-3);
    }

    #[test]
    fn older_activity_scores_strictly_lower() {
        let mut previous = f64::INFINITY;
        for days in [0, 1, 7, 35, 100, 365] {
            let score = popularity_score(4, 2, days);
            assert!(score < previous, "score should drop at {days} days");
            previous = score;
        }
    }

    #[test]
    fn future_activity_boosts_recency() {
        let p = project("planned", now() + Duration::days(3));
        let stats = score_projects(&[p], &[], now());
        assert_eq!(stats[0].days_since_last_activity, -3);
        assert!(stats[0].score > 3.0);
    }

    #[test]
    fn days_since_floors_partial_days() {
        assert_eq!(days_since(now(), now() - Duration::hours(47)), 1);
        assert_eq!(days_since(now(), now() - Duration::hours(48)), 2);
        assert_eq!(days_since(now(), now() + Duration::hours(1)), -1);
    }

    #[test]
    fn most_recent_activity_uses_creation_of_latest_completed() {
        let p = project("p", now() - Duration::days(100));
        // Created long ago but completed yesterday: wins on activity date,
        // yet contributes its creation time.
        let old_but_done = action(
            &p,
            now() - Duration::days(50),
            Some(now() - Duration::days(1)),
        );
        let newer_open = action(&p, now() - Duration::days(10), None);
        let actions = [&old_but_done, &newer_open];
        assert_eq!(most_recent_activity(&p, &actions), now() - Duration::days(50));
    }

    #[test]
    fn most_recent_activity_tie_goes_to_later_action() {
        let p = project("p", now() - Duration::days(100));
        let stamp = now() - Duration::days(2);
        let first = action(&p, now() - Duration::days(30), Some(stamp));
        let second = action(&p, now() - Duration::days(20), Some(stamp));
        let actions = [&first, &second];
        assert_eq!(most_recent_activity(&p, &actions), now() - Duration::days(20));
    }

    #[test]
    fn orphan_actions_are_ignored() {
        let active = project("active", now() - Duration::days(10));
        let archived = project("archived", now());
        let orphans: Vec<Action> = (0..5)
            .map(|_| action(&archived, now(), Some(now())))
            .collect();
        let mut unassigned = Action::from_draft(ActionDraft::titled("loose"), now()).unwrap();
        unassigned.completed = Some(now());

        let mut all = orphans.clone();
        all.push(unassigned);
        let groups = group_by_project(std::slice::from_ref(&active), &all);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].1.is_empty());

        let with_orphans = score_projects(std::slice::from_ref(&active), &all, now());
        let without = score_projects(std::slice::from_ref(&active), &[], now());
        assert!(close(with_orphans[0].score, without[0].score));
        assert_eq!(
            rank(&[active.clone()], &all, 5, now()),
            vec![QuickPick { id: active.id, title: "active".to_string() }]
        );
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let a = project("A", now() - Duration::days(4));
        let b = project("B", now() - Duration::days(4));
        let picked = rank(&[a.clone(), b.clone()], &[], 1, now());
        assert_eq!(picked, vec![QuickPick { id: a.id, title: "A".to_string() }]);

        let picked = rank(&[b.clone(), a.clone()], &[], 1, now());
        assert_eq!(picked[0].id, b.id);
    }

    #[test]
    fn top_zero_returns_nothing() {
        let projects: Vec<Project> = (0..4)
            .map(|i| project(&format!("p{i}"), now()))
            .collect();
        assert!(rank(&projects, &[], 0, now()).is_empty());
    }

    #[test]
    fn top_larger_than_input_returns_all_sorted() {
        let stale = project("stale", now() - Duration::days(200));
        let recent = project("recent", now() - Duration::days(1));
        let mid = project("mid", now() - Duration::days(40));
        let picked = rank(&[stale, recent, mid], &[], 10, now());
        let titles: Vec<&str> = picked.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["recent", "mid", "stale"]);
    }

    #[test]
    fn result_is_bounded_sorted_subset() {
        let projects: Vec<Project> = (0..8)
            .map(|i| project(&format!("p{i}"), now() - Duration::days(i * 13)))
            .collect();
        let mut actions = Vec::new();
        for (i, p) in projects.iter().enumerate() {
            for j in 0..i {
                let done = (j % 2 == 0).then(|| now() - Duration::days(j as i64));
                actions.push(action(p, now() - Duration::days((i * 3) as i64), done));
            }
        }

        for top in [0, 1, 3, 8, 20] {
            let picked = rank(&projects, &actions, top, now());
            assert_eq!(picked.len(), top.min(projects.len()));
            for pick in &picked {
                let source = projects.iter().find(|p| p.id == pick.id).unwrap();
                assert_eq!(source.title, pick.title);
            }
        }

        let scores: Vec<f64> = score_projects(&projects, &actions, now())
            .iter()
            .map(|s| s.score)
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn completion_rate_outweighs_volume_for_equal_recency() {
        let finisher = project("finisher", now());
        let hoarder = project("hoarder", now());
        let mut actions = vec![
            action(&finisher, now(), Some(now())),
            action(&finisher, now(), Some(now())),
        ];
        actions.extend((0..4).map(|_| action(&hoarder, now(), None)));

        let stats = score_projects(&[hoarder, finisher], &actions, now());
        assert_eq!(stats[0].title, "finisher");
        assert_eq!(stats[1].completed_actions, 0);
    }
}

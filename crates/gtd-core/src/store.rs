use crate::action::{self, Action, ActionDraft};
use crate::error::{GtdError, Result};
use crate::inbox::{self, In};
use crate::paths;
use crate::popular::{self, ProjectStats, QuickPick};
use crate::project::{self, Project, ProjectDraft};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Every in, action, and project, persisted as one YAML document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub ins: Vec<In>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

fn default_version() -> u32 {
    1
}

impl Store {
    pub fn new() -> Self {
        Self {
            version: default_version(),
            ..Self::default()
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::store_path(root);
        if !path.exists() {
            return Err(GtdError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let store: Store = serde_yaml::from_str(&data)?;
        Ok(store)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::store_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())?;
        tracing::debug!(
            ins = self.ins.len(),
            actions = self.actions.len(),
            projects = self.projects.len(),
            "store saved"
        );
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Id resolution
    // ---------------------------------------------------------------------------

    pub fn resolve_in_id(&self, prefix: &str) -> Result<Uuid> {
        resolve_prefix(self.ins.iter().map(|i| i.id), prefix)?
            .ok_or_else(|| GtdError::InNotFound(prefix.to_string()))
    }

    pub fn resolve_action_id(&self, prefix: &str) -> Result<Uuid> {
        resolve_prefix(self.actions.iter().map(|a| a.id), prefix)?
            .ok_or_else(|| GtdError::ActionNotFound(prefix.to_string()))
    }

    pub fn resolve_project_id(&self, prefix: &str) -> Result<Uuid> {
        resolve_prefix(self.projects.iter().map(|p| p.id), prefix)?
            .ok_or_else(|| GtdError::ProjectNotFound(prefix.to_string()))
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn action(&self, id: Uuid) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    // ---------------------------------------------------------------------------
    // Inbox
    // ---------------------------------------------------------------------------

    pub fn add_in(&mut self, text: &str, now: DateTime<Utc>) -> Result<Uuid> {
        inbox::add_in(&mut self.ins, text, now)
    }

    pub fn delete_in(&mut self, id: Uuid) -> Result<()> {
        inbox::delete_in(&mut self.ins, id)
    }

    /// Triage an in into a new action. An empty draft title falls back to the
    /// in's text.
    pub fn move_in_to_action(
        &mut self,
        id: Uuid,
        mut draft: ActionDraft,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        self.check_project_ref(draft.project_id)?;
        let text = self.peek_pending_in(id)?;
        if draft.title.trim().is_empty() {
            draft.title = text;
        }
        let new = Action::from_draft(draft, now)?;
        inbox::mark_moved(&mut self.ins, id)?;
        let action_id = new.id;
        self.actions.push(new);
        Ok(action_id)
    }

    /// Triage an in into a new project. An empty draft title falls back to the
    /// in's text.
    pub fn move_in_to_project(
        &mut self,
        id: Uuid,
        mut draft: ProjectDraft,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        if let Some(parent) = draft.parent_project_id {
            project::validate_parent(&self.projects, None, parent)?;
        }
        let text = self.peek_pending_in(id)?;
        if draft.title.trim().is_empty() {
            draft.title = text;
        }
        let new = Project::from_draft(draft, now)?;
        inbox::mark_moved(&mut self.ins, id)?;
        let project_id = new.id;
        self.projects.push(new);
        Ok(project_id)
    }

    fn peek_pending_in(&self, id: Uuid) -> Result<String> {
        let item = self
            .ins
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| GtdError::InNotFound(id.to_string()))?;
        if item.moved {
            return Err(GtdError::AlreadyMoved(id.to_string()));
        }
        Ok(item.text.clone())
    }

    // ---------------------------------------------------------------------------
    // Actions
    // ---------------------------------------------------------------------------

    pub fn add_action(&mut self, draft: ActionDraft, now: DateTime<Utc>) -> Result<Uuid> {
        self.check_project_ref(draft.project_id)?;
        let new = Action::from_draft(draft, now)?;
        let id = new.id;
        self.actions.push(new);
        Ok(id)
    }

    pub fn edit_action(&mut self, id: Uuid, draft: ActionDraft) -> Result<()> {
        self.check_project_ref(draft.project_id)?;
        action::find_mut(&mut self.actions, id)?.apply(draft)
    }

    pub fn complete_action(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        action::complete_action(&mut self.actions, id, now)
    }

    pub fn uncomplete_action(&mut self, id: Uuid) -> Result<()> {
        action::uncomplete_action(&mut self.actions, id)
    }

    pub fn archive_action(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        action::archive_action(&mut self.actions, id, now)
    }

    pub fn unarchive_action(&mut self, id: Uuid) -> Result<()> {
        action::unarchive_action(&mut self.actions, id)
    }

    pub fn delete_action(&mut self, id: Uuid) -> Result<()> {
        action::delete_action(&mut self.actions, id)
    }

    fn check_project_ref(&self, project_id: Option<Uuid>) -> Result<()> {
        match project_id {
            Some(id) if self.project(id).is_none() => {
                Err(GtdError::ProjectNotFound(id.to_string()))
            }
            _ => Ok(()),
        }
    }

    // ---------------------------------------------------------------------------
    // Projects
    // ---------------------------------------------------------------------------

    pub fn create_project(&mut self, draft: ProjectDraft, now: DateTime<Utc>) -> Result<Uuid> {
        if let Some(parent) = draft.parent_project_id {
            project::validate_parent(&self.projects, None, parent)?;
        }
        let new = Project::from_draft(draft, now)?;
        let id = new.id;
        self.projects.push(new);
        Ok(id)
    }

    pub fn edit_project(&mut self, id: Uuid, draft: ProjectDraft) -> Result<()> {
        if let Some(parent) = draft.parent_project_id {
            project::validate_parent(&self.projects, Some(id), parent)?;
        }
        project::find_mut(&mut self.projects, id)?.apply(draft)
    }

    pub fn complete_project(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        project::complete_project(&mut self.projects, &self.actions, id, now)
    }

    pub fn uncomplete_project(&mut self, id: Uuid) -> Result<()> {
        project::uncomplete_project(&mut self.projects, id)
    }

    pub fn archive_project(&mut self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        project::archive_project(&mut self.projects, &self.actions, id, now)
    }

    pub fn unarchive_project(&mut self, id: Uuid) -> Result<()> {
        project::unarchive_project(&mut self.projects, id)
    }

    pub fn delete_project(&mut self, id: Uuid) -> Result<()> {
        project::delete_project(&mut self.projects, &self.actions, id)
    }

    // ---------------------------------------------------------------------------
    // Ranking
    // ---------------------------------------------------------------------------

    fn active_project_snapshot(&self) -> Vec<Project> {
        project::active_projects(&self.projects)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Quick-pick list: the `top` most popular active projects.
    pub fn popular_projects(&self, top: usize, now: DateTime<Utc>) -> Vec<QuickPick> {
        popular::rank(&self.active_project_snapshot(), &self.actions, top, now)
    }

    /// The project at 1-based `rank` in the quick-pick list of size `top`.
    /// `exclude` is dropped from the list after ranking, so a project is never
    /// offered as its own parent.
    pub fn quick_pick(
        &self,
        top: usize,
        rank: usize,
        exclude: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Uuid> {
        let picks: Vec<QuickPick> = self
            .popular_projects(top, now)
            .into_iter()
            .filter(|p| Some(p.id) != exclude)
            .collect();
        rank.checked_sub(1)
            .and_then(|i| picks.get(i))
            .map(|p| p.id)
            .ok_or(GtdError::PickOutOfRange {
                rank,
                available: picks.len(),
            })
    }

    /// Full scoring breakdown for every active project, best first.
    pub fn project_scores(&self, now: DateTime<Utc>) -> Vec<ProjectStats> {
        popular::score_projects(&self.active_project_snapshot(), &self.actions, now)
    }
}

/// Find the single id whose hyphenated form starts with `prefix`.
fn resolve_prefix(ids: impl Iterator<Item = Uuid>, prefix: &str) -> Result<Option<Uuid>> {
    let prefix = prefix.trim().to_ascii_lowercase();
    if prefix.is_empty() {
        return Ok(None);
    }
    let mut found = None;
    for id in ids {
        if id.to_string().starts_with(&prefix) {
            if found.is_some() {
                return Err(GtdError::AmbiguousId(prefix));
            }
            found = Some(id);
        }
    }
    Ok(found)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    #[test]
    fn load_missing_store_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(Store::load(dir.path()), Err(GtdError::NotInitialized)));
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let mut store = Store::new();
        let in_id = store.add_in("paint the fence", now).unwrap();
        let project_id = store.create_project(ProjectDraft::titled("House"), now).unwrap();
        let mut draft = ActionDraft::titled("");
        draft.project_id = Some(project_id);
        store.move_in_to_action(in_id, draft, now).unwrap();
        store.save(dir.path()).unwrap();

        let loaded = Store::load(dir.path()).unwrap();
        assert_eq!(loaded.ins.len(), 1);
        assert!(loaded.ins[0].moved);
        assert_eq!(loaded.actions[0].title, "paint the fence");
        assert_eq!(loaded.actions[0].project_id, Some(project_id));
    }

    #[test]
    fn move_in_twice_fails_without_side_effects() {
        let now = Utc::now();
        let mut store = Store::new();
        let id = store.add_in("idea", now).unwrap();
        store.move_in_to_project(id, ProjectDraft::default(), now).unwrap();
        assert!(matches!(
            store.move_in_to_action(id, ActionDraft::default(), now),
            Err(GtdError::AlreadyMoved(_))
        ));
        assert!(store.actions.is_empty());
        assert_eq!(store.projects[0].title, "idea");
    }

    #[test]
    fn move_in_with_unknown_project_fails() {
        let now = Utc::now();
        let mut store = Store::new();
        let id = store.add_in("idea", now).unwrap();
        let mut draft = ActionDraft::titled("do it");
        draft.project_id = Some(Uuid::new_v4());
        assert!(matches!(
            store.move_in_to_action(id, draft, now),
            Err(GtdError::ProjectNotFound(_))
        ));
        assert!(!store.ins[0].moved);
    }

    #[test]
    fn resolve_prefix_unique_and_ambiguous() {
        let a = Uuid::parse_str("aaaa1111-0000-4000-8000-000000000000").unwrap();
        let b = Uuid::parse_str("aaaa2222-0000-4000-8000-000000000000").unwrap();
        let ids = [a, b];
        assert_eq!(resolve_prefix(ids.into_iter(), "AAAA1").unwrap(), Some(a));
        assert!(matches!(
            resolve_prefix(ids.into_iter(), "aaaa"),
            Err(GtdError::AmbiguousId(_))
        ));
        assert_eq!(resolve_prefix(ids.into_iter(), "ffff").unwrap(), None);
        assert_eq!(resolve_prefix(ids.into_iter(), "").unwrap(), None);
    }

    #[test]
    fn popular_projects_skip_inactive() {
        let now = Utc::now();
        let mut store = Store::new();
        let done = store.create_project(ProjectDraft::titled("Done"), now).unwrap();
        let shelved = store.create_project(ProjectDraft::titled("Shelved"), now).unwrap();
        let live = store
            .create_project(ProjectDraft::titled("Live"), now - Duration::days(60))
            .unwrap();
        store.complete_project(done, now).unwrap();
        store.archive_project(shelved, now).unwrap();

        let picks = store.popular_projects(6, now);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, live);
        assert_eq!(store.project_scores(now)[0].title, "Live");
    }

    #[test]
    fn quick_pick_by_rank_and_exclusion() {
        let now = Utc::now();
        let mut store = Store::new();
        let quiet = store.create_project(ProjectDraft::titled("Quiet"), now).unwrap();
        let busy = store.create_project(ProjectDraft::titled("Busy"), now).unwrap();
        let mut draft = ActionDraft::titled("ship");
        draft.project_id = Some(busy);
        let done = store.add_action(draft, now).unwrap();
        store.complete_action(done, now).unwrap();

        assert_eq!(store.quick_pick(6, 1, None, now).unwrap(), busy);
        assert_eq!(store.quick_pick(6, 2, None, now).unwrap(), quiet);
        assert_eq!(store.quick_pick(6, 1, Some(busy), now).unwrap(), quiet);
        assert!(matches!(
            store.quick_pick(6, 2, Some(busy), now),
            Err(GtdError::PickOutOfRange { rank: 2, available: 1 })
        ));
        assert!(matches!(
            store.quick_pick(6, 0, None, now),
            Err(GtdError::PickOutOfRange { rank: 0, .. })
        ));
        // The list is cut at `top` before anything else.
        assert!(store.quick_pick(1, 2, None, now).is_err());
    }

    #[test]
    fn edit_project_rejects_cycle() {
        let now = Utc::now();
        let mut store = Store::new();
        let parent = store.create_project(ProjectDraft::titled("Parent"), now).unwrap();
        let mut draft = ProjectDraft::titled("Child");
        draft.parent_project_id = Some(parent);
        let child = store.create_project(draft, now).unwrap();

        let mut cycle = ProjectDraft::titled("Parent");
        cycle.parent_project_id = Some(child);
        assert!(matches!(
            store.edit_project(parent, cycle),
            Err(GtdError::InvalidParent { .. })
        ));
    }
}

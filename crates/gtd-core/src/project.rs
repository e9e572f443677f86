use crate::action::Action;
use crate::error::{GtdError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub notes: String,
    pub parent_project_id: Option<Uuid>,
}

impl ProjectDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn validated_title(&self) -> Result<String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(GtdError::EmptyTitle);
        }
        Ok(title.to_string())
    }
}

impl Project {
    pub fn from_draft(draft: ProjectDraft, now: DateTime<Utc>) -> Result<Self> {
        let title = draft.validated_title()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: draft.description,
            notes: draft.notes,
            parent_project_id: draft.parent_project_id,
            created_at: now,
            completed: None,
            archived: None,
        })
    }

    pub fn apply(&mut self, draft: ProjectDraft) -> Result<()> {
        self.title = draft.validated_title()?;
        self.description = draft.description;
        self.notes = draft.notes;
        self.parent_project_id = draft.parent_project_id;
        Ok(())
    }

    /// Neither completed nor archived.
    pub fn is_active(&self) -> bool {
        self.completed.is_none() && self.archived.is_none()
    }
}

// ---------------------------------------------------------------------------
// Project list operations
// ---------------------------------------------------------------------------

/// Check that `parent` can become the parent of `project`.
///
/// The parent must exist, differ from the project, and must not already sit
/// below the project in the tree. `project` is `None` for a project that does
/// not exist yet.
pub fn validate_parent(projects: &[Project], project: Option<Uuid>, parent: Uuid) -> Result<()> {
    let invalid = |reason: &str| GtdError::InvalidParent {
        project: project.map(|p| p.to_string()).unwrap_or_else(|| "(new)".to_string()),
        reason: reason.to_string(),
    };

    let parents: HashMap<Uuid, Option<Uuid>> = projects
        .iter()
        .map(|p| (p.id, p.parent_project_id))
        .collect();
    if !parents.contains_key(&parent) {
        return Err(GtdError::ProjectNotFound(parent.to_string()));
    }
    let Some(project) = project else {
        return Ok(());
    };
    if project == parent {
        return Err(invalid("a project cannot be its own parent"));
    }

    let mut seen = HashSet::new();
    let mut cursor = Some(parent);
    while let Some(id) = cursor {
        if id == project {
            return Err(invalid("parent is a descendant of the project"));
        }
        if !seen.insert(id) {
            break;
        }
        cursor = parents.get(&id).copied().flatten();
    }
    Ok(())
}

/// Any action or sub-project references this project.
pub fn has_children(projects: &[Project], actions: &[Action], id: Uuid) -> bool {
    actions.iter().any(|a| a.project_id == Some(id))
        || projects.iter().any(|p| p.parent_project_id == Some(id))
}

pub fn has_open_actions(actions: &[Action], id: Uuid) -> bool {
    actions
        .iter()
        .any(|a| a.project_id == Some(id) && a.is_open())
}

pub fn complete_project(
    projects: &mut [Project],
    actions: &[Action],
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    if has_open_actions(actions, id) {
        return Err(GtdError::HasOpenActions(id.to_string()));
    }
    find_mut(projects, id)?.completed = Some(now);
    Ok(())
}

pub fn uncomplete_project(projects: &mut [Project], id: Uuid) -> Result<()> {
    find_mut(projects, id)?.completed = None;
    Ok(())
}

pub fn archive_project(
    projects: &mut [Project],
    actions: &[Action],
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<()> {
    if has_children(projects, actions, id) {
        return Err(GtdError::HasChildren(id.to_string()));
    }
    find_mut(projects, id)?.archived = Some(now);
    Ok(())
}

pub fn unarchive_project(projects: &mut [Project], id: Uuid) -> Result<()> {
    find_mut(projects, id)?.archived = None;
    Ok(())
}

pub fn delete_project(projects: &mut Vec<Project>, actions: &[Action], id: Uuid) -> Result<()> {
    if has_children(projects, actions, id) {
        return Err(GtdError::HasChildren(id.to_string()));
    }
    let pos = projects
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| GtdError::ProjectNotFound(id.to_string()))?;
    projects.remove(pos);
    Ok(())
}

/// Active projects, oldest first.
pub fn active_projects(projects: &[Project]) -> Vec<&Project> {
    let mut out: Vec<&Project> = projects.iter().filter(|p| p.is_active()).collect();
    out.sort_by_key(|p| p.created_at);
    out
}

pub(crate) fn find_mut(projects: &mut [Project], id: Uuid) -> Result<&mut Project> {
    projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| GtdError::ProjectNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionDraft;

    fn project(title: &str, parent: Option<Uuid>) -> Project {
        let mut draft = ProjectDraft::titled(title);
        draft.parent_project_id = parent;
        Project::from_draft(draft, Utc::now()).unwrap()
    }

    fn action_in(project: Uuid) -> Action {
        let mut draft = ActionDraft::titled("step");
        draft.project_id = Some(project);
        Action::from_draft(draft, Utc::now()).unwrap()
    }

    #[test]
    fn parent_cycle_rejected() {
        let root = project("root", None);
        let child = project("child", Some(root.id));
        let grandchild = project("grandchild", Some(child.id));
        let projects = vec![root.clone(), child.clone(), grandchild.clone()];

        validate_parent(&projects, Some(grandchild.id), root.id).unwrap();
        assert!(matches!(
            validate_parent(&projects, Some(root.id), grandchild.id),
            Err(GtdError::InvalidParent { .. })
        ));
        assert!(matches!(
            validate_parent(&projects, Some(child.id), child.id),
            Err(GtdError::InvalidParent { .. })
        ));
        assert!(matches!(
            validate_parent(&projects, None, Uuid::new_v4()),
            Err(GtdError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn complete_refused_with_open_actions() {
        let p = project("garden", None);
        let mut projects = vec![p.clone()];
        let mut actions = vec![action_in(p.id)];

        assert!(matches!(
            complete_project(&mut projects, &actions, p.id, Utc::now()),
            Err(GtdError::HasOpenActions(_))
        ));

        actions[0].completed = Some(Utc::now());
        complete_project(&mut projects, &actions, p.id, Utc::now()).unwrap();
        assert!(!projects[0].is_active());
    }

    #[test]
    fn archive_and_delete_refused_with_children() {
        let parent = project("parent", None);
        let sub = project("sub", Some(parent.id));
        let mut projects = vec![parent.clone(), sub.clone()];
        let actions: Vec<Action> = Vec::new();

        assert!(matches!(
            archive_project(&mut projects, &actions, parent.id, Utc::now()),
            Err(GtdError::HasChildren(_))
        ));
        assert!(matches!(
            delete_project(&mut projects, &actions, parent.id),
            Err(GtdError::HasChildren(_))
        ));

        delete_project(&mut projects, &actions, sub.id).unwrap();
        archive_project(&mut projects, &actions, parent.id, Utc::now()).unwrap();
        assert!(active_projects(&projects).is_empty());
        unarchive_project(&mut projects, parent.id).unwrap();
        assert_eq!(active_projects(&projects).len(), 1);
    }

    #[test]
    fn has_children_counts_completed_actions() {
        let p = project("p", None);
        let mut a = action_in(p.id);
        a.completed = Some(Utc::now());
        assert!(has_children(&[p.clone()], &[a.clone()], p.id));
        assert!(!has_open_actions(&[a], p.id));
    }
}

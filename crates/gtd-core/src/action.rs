use crate::error::{GtdError, Result};
use crate::types::ActionType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<DateTime<Utc>>,
}

/// Editable fields of an action, as submitted by a move or edit.
#[derive(Debug, Clone, Default)]
pub struct ActionDraft {
    pub title: String,
    pub description: String,
    pub notes: String,
    pub deadline: Option<DateTime<Utc>>,
    pub project_id: Option<Uuid>,
    pub action_type: ActionType,
}

impl ActionDraft {
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

impl Action {
    pub fn from_draft(draft: ActionDraft, now: DateTime<Utc>) -> Result<Self> {
        let title = draft.validated_title()?;
        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description: draft.description,
            notes: draft.notes,
            action_type: draft.action_type,
            deadline: draft.deadline,
            project_id: draft.project_id,
            created_at: now,
            completed: None,
            archived: None,
        })
    }

    /// Replace every editable field. Completion and archival are untouched.
    pub fn apply(&mut self, draft: ActionDraft) -> Result<()> {
        self.title = draft.validated_title()?;
        self.description = draft.description;
        self.notes = draft.notes;
        self.action_type = draft.action_type;
        self.deadline = draft.deadline;
        self.project_id = draft.project_id;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.completed.is_none() && self.archived.is_none()
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.deadline.is_some_and(|d| d < now)
    }

    /// Completion time if present, else creation time.
    pub fn activity_date(&self) -> DateTime<Utc> {
        self.completed.unwrap_or(self.created_at)
    }
}

// ---------------------------------------------------------------------------
// Action list operations (operate on a mutable Vec<Action>)
// ---------------------------------------------------------------------------

pub fn complete_action(actions: &mut [Action], id: Uuid, now: DateTime<Utc>) -> Result<()> {
    find_mut(actions, id)?.completed = Some(now);
    Ok(())
}

pub fn uncomplete_action(actions: &mut [Action], id: Uuid) -> Result<()> {
    find_mut(actions, id)?.completed = None;
    Ok(())
}

pub fn archive_action(actions: &mut [Action], id: Uuid, now: DateTime<Utc>) -> Result<()> {
    find_mut(actions, id)?.archived = Some(now);
    Ok(())
}

pub fn unarchive_action(actions: &mut [Action], id: Uuid) -> Result<()> {
    find_mut(actions, id)?.archived = None;
    Ok(())
}

pub fn delete_action(actions: &mut Vec<Action>, id: Uuid) -> Result<()> {
    let pos = actions
        .iter()
        .position(|a| a.id == id)
        .ok_or_else(|| GtdError::ActionNotFound(id.to_string()))?;
    actions.remove(pos);
    Ok(())
}

/// Open actions: `now` first, `waiting_for` last, then by deadline (none last)
/// and creation time.
pub fn open_actions(actions: &[Action]) -> Vec<&Action> {
    let mut out: Vec<&Action> = actions.iter().filter(|a| a.is_open()).collect();
    out.sort_by(|a, b| {
        a.action_type
            .sort_rank()
            .cmp(&b.action_type.sort_rank())
            .then_with(|| match (a.deadline, b.deadline) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    out
}

pub(crate) fn find_mut(actions: &mut [Action], id: Uuid) -> Result<&mut Action> {
    actions
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| GtdError::ActionNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

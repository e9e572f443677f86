use crate::error::{GtdError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// In
// ---------------------------------------------------------------------------

/// A quickly captured note waiting to be triaged into an action or project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct In {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub moved: bool,
    pub created_at: DateTime<Utc>,
}

impl In {
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            moved: false,
            created_at: now,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbox operations (operate on a mutable Vec<In>)
// ---------------------------------------------------------------------------

pub fn add_in(ins: &mut Vec<In>, text: &str, now: DateTime<Utc>) -> Result<Uuid> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GtdError::EmptyText);
    }
    let item = In::new(text, now);
    let id = item.id;
    ins.push(item);
    Ok(id)
}

/// Unmoved ins, oldest first.
pub fn pending(ins: &[In]) -> Vec<&In> {
    let mut out: Vec<&In> = ins.iter().filter(|i| !i.moved).collect();
    out.sort_by_key(|i| i.created_at);
    out
}

pub fn delete_in(ins: &mut Vec<In>, id: Uuid) -> Result<()> {
    let pos = ins
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| GtdError::InNotFound(id.to_string()))?;
    ins.remove(pos);
    Ok(())
}

/// Flag an in as moved and hand back its text. Moving twice is an error.
pub fn mark_moved(ins: &mut [In], id: Uuid) -> Result<String> {
    let item = ins
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| GtdError::InNotFound(id.to_string()))?;
    if item.moved {
        return Err(GtdError::AlreadyMoved(id.to_string()));
    }
    item.moved = true;
    Ok(item.text.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

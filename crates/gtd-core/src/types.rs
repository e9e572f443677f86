use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Nothing,
    Now,
    WaitingFor,
}

impl ActionType {
    pub fn all() -> &'static [ActionType] {
        &[ActionType::Nothing, ActionType::Now, ActionType::WaitingFor]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Nothing => "nothing",
            ActionType::Now => "now",
            ActionType::WaitingFor => "waiting_for",
        }
    }

    /// Position in the open-action list: `now` first, `waiting_for` last.
    pub fn sort_rank(self) -> u8 {
        match self {
            ActionType::Now => 0,
            ActionType::Nothing => 1,
            ActionType::WaitingFor => 2,
        }
    }

    /// Short prefix shown before a title, e.g. `[NOW]`. Empty for `nothing`.
    pub fn label(self) -> &'static str {
        match self {
            ActionType::Nothing => "",
            ActionType::Now => "[NOW]",
            ActionType::WaitingFor => "[WAITING FOR]",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = crate::error::GtdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "nothing" => Ok(ActionType::Nothing),
            "now" => Ok(ActionType::Now),
            "waiting_for" => Ok(ActionType::WaitingFor),
            _ => Err(crate::error::GtdError::InvalidActionType {
                given: s.to_string(),
                expected: ActionType::all()
                    .iter()
                    .map(|t| t.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

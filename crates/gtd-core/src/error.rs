use thiserror::Error;

#[derive(Debug, Error)]
pub enum GtdError {
    #[error("not initialized: run 'gtd init'")]
    NotInitialized,

    #[error("in not found: {0}")]
    InNotFound(String),

    #[error("in already moved: {0}")]
    AlreadyMoved(String),

    #[error("action not found: {0}")]
    ActionNotFound(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("ambiguous id prefix '{0}': matches more than one record")]
    AmbiguousId(String),

    #[error("text must not be empty")]
    EmptyText,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid action type '{given}': expected one of {expected}")]
    InvalidActionType { given: String, expected: String },

    #[error("no quick pick #{rank}: {available} available")]
    PickOutOfRange { rank: usize, available: usize },

    #[error("invalid parent for project {project}: {reason}")]
    InvalidParent { project: String, reason: String },

    #[error("project {0} still has actions or sub-projects")]
    HasChildren(String),

    #[error("project {0} still has open actions")]
    HasOpenActions(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, GtdError>;

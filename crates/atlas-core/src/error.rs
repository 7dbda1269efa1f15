use crate::types::ItemType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("invalid status '{0}': must be one of backlog, ready, in_progress, in_review, testing, done, blocked")]
    InvalidStatus(String),

    #[error("invalid item type '{0}': must be one of feature, bug, tech_debt, epic, all")]
    InvalidItemType(String),

    #[error("no {0} IDs left: the counter is at its maximum")]
    IdsExhausted(ItemType),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lightweight reference to another entity, carried by conflicts and ledger events
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: u64,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Malformed or missing required input
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// A uniqueness rule would be violated; prior state is unchanged
    #[error("{message}")]
    Conflict {
        message: String,
        conflicting: Option<EntityRef>,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// The store failed to save a mutation, which was rolled back
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>, conflicting: EntityRef) -> Self {
        Self::Conflict {
            message: message.into(),
            conflicting: Some(conflicting),
        }
    }

    pub fn device_not_found(id: u64) -> Self {
        Self::NotFound {
            entity: "Device",
            id,
        }
    }

    pub fn device_type_not_found(id: u64) -> Self {
        Self::NotFound {
            entity: "Device type",
            id,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Conflict { .. } => "conflict",
            Self::NotFound { .. } => "not_found",
            Self::Persistence(_) => "persistence",
        }
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;

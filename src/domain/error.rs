use thiserror::Error;

/// Core domain errors
///
/// `Conflict` is the only variant the retry executor acts on. It is internal
/// to the write path and is translated before reaching top-level callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} '{id}' not found")]
    NotFound { entity_type: String, id: String },

    #[error("Actor '{actor}' is not allowed to {action} {entity_type}")]
    Unauthorized {
        actor: String,
        entity_type: String,
        action: String,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Gave up after {attempts} conflicting attempts")]
    RetryExhausted { attempts: u32 },

    #[error("Retry deadline exceeded after {attempts} attempts")]
    RetryTimeout { attempts: u32 },

    #[error("Registration failed: {message}")]
    RegistrationFailed { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },
}

impl DomainError {
    pub fn not_found(entity_type: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn unauthorized(
        actor: impl Into<String>,
        entity_type: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self::Unauthorized {
            actor: actor.into(),
            entity_type: entity_type.into(),
            action: action.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn retry_exhausted(attempts: u32) -> Self {
        Self::RetryExhausted { attempts }
    }

    pub fn retry_timeout(attempts: u32) -> Self {
        Self::RetryTimeout { attempts }
    }

    pub fn registration_failed(message: impl Into<String>) -> Self {
        Self::RegistrationFailed {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Whether the retry executor should start another attempt
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

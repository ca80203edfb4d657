//! Error types for the Cinetrack dialog core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Cinetrack core.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum CinetrackError {
    /// Navigation stack invariant violation: the stack must always hold at
    /// least one frame, and the root frame may never be popped.
    #[error("Navigation stack is empty or at its root frame")]
    EmptyStack,

    /// The session backing store could not be reached. The engine aborts
    /// before any mutation and the inbound event is failed back to the
    /// transport for a retry-or-drop decision.
    #[error("Session store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// An external collaborator failed or timed out while a loader was
    /// building a render model.
    #[error("Loader failed for state '{state}': {message}")]
    Loader { state: String, message: String },

    /// No transition rule matched the inbound event in the current state.
    /// The engine treats this as a no-op re-render, not a user-facing error.
    #[error("No transition matched in state '{state}'")]
    TransitionNotFound { state: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error (including registry validation failures)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CinetrackError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    /// Creates a Loader error
    pub fn loader(state: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Loader {
            state: state.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an EmptyStack error
    pub fn is_empty_stack(&self) -> bool {
        matches!(self, Self::EmptyStack)
    }

    /// Check if this is a StoreUnavailable error
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Check if this is a Loader error
    pub fn is_loader(&self) -> bool {
        matches!(self, Self::Loader { .. })
    }

    /// Check if this is a TransitionNotFound error
    pub fn is_transition_not_found(&self) -> bool {
        matches!(self, Self::TransitionNotFound { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CinetrackError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CinetrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CinetrackError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CinetrackError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, for application edges)
impl From<anyhow::Error> for CinetrackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<String> for CinetrackError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, CinetrackError>`.
pub type Result<T> = std::result::Result<T, CinetrackError>;

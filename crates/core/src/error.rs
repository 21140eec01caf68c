//! Error types for the Gigmate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Gigmate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Capability errors ---
    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    // --- Session errors ---
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // --- Context errors ---
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the generative-model client.
///
/// `Invocation` means the call itself failed; `Parse` and `Validation` mean
/// the model answered but its output could not be turned into a structured
/// intent. Neither is retried by the pipeline.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Model invocation failed: {0}")]
    Invocation(String),

    #[error("Model API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Model output is not valid JSON: {0}")]
    Parse(String),

    #[error("Model output does not conform to the intent schema: {0}")]
    Validation(String),

    #[error("Model not configured: {0}")]
    NotConfigured(String),

    #[error("Model request timed out: {0}")]
    Timeout(String),
}

#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    #[error("Capability not found: {0}")]
    NotFound(String),

    #[error("Capability execution failed: {name} — {reason}")]
    Execution { name: String, reason: String },

    #[error("Invalid capability parameters: {0}")]
    InvalidParameters(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found for user {user_id}, conversation {conversation_id}")]
    NotFound {
        user_id: String,
        conversation_id: String,
    },

    #[error("Session storage error: {0}")]
    Storage(String),
}

#[derive(Debug, Clone, Error)]
pub enum ContextError {
    #[error("Context fetch failed: {0}")]
    FetchFailed(String),

    #[error("Profile endpoint unavailable: {0}")]
    Unavailable(String),
}

impl CapabilityError {
    /// The raw error text used by the retry classifier and the explanation
    /// prompt. Never shown to users directly.
    pub fn detail(&self) -> String {
        match self {
            CapabilityError::NotFound(name) => format!("capability not found: {name}"),
            CapabilityError::Execution { reason, .. } => reason.clone(),
            CapabilityError::InvalidParameters(msg) => msg.clone(),
        }
    }
}

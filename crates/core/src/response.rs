//! The `AgentResponse` value object.
//!
//! Every path through the orchestrator — cache hit, fast path, pipeline
//! success, pipeline failure, catch-all apology — terminates in one of
//! these. There is no "null response" anywhere in the engine.

use serde::{Deserialize, Serialize};

/// The result of one `process()` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Human-readable reply text
    pub message: String,

    /// Optional structured payload from a capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Whether the turn was answered successfully
    pub success: bool,

    /// Which capability produced the reply, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_used: Option<String>,

    /// Suggested follow-up actions (empty when none apply)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,

    /// Wall-clock time spent producing this response
    pub elapsed_ms: u64,

    /// Whether this reply was served from the response cache
    #[serde(default)]
    pub cached: bool,
}

impl AgentResponse {
    /// A successful reply.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            success: true,
            capability_used: None,
            suggestions: Vec::new(),
            elapsed_ms: 0,
            cached: false,
        }
    }

    /// A failed reply. Still a well-formed value, never an error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
            success: false,
            capability_used: None,
            suggestions: Vec::new(),
            elapsed_ms: 0,
            cached: false,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capability_used = Some(name.into());
        self
    }

    pub fn with_suggestions<I, S>(mut self, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggestions = suggestions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_elapsed(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    /// Mark this response as served from cache.
    pub fn as_cached(mut self) -> Self {
        self.cached = true;
        self
    }
}

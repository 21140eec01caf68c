//! Turn and session domain types.
//!
//! These are the core value objects that flow through the engine:
//! a user message becomes a `ChatTurn` once answered, and turns accumulate
//! (bounded) inside a `ConversationSession` keyed by (user, conversation).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifies one conversation: a (user, conversation) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub user_id: String,
    pub conversation_id: String,
}

impl SessionKey {
    pub fn new(user_id: impl Into<String>, conversation_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            conversation_id: conversation_id.into(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user_id, self.conversation_id)
    }
}

/// One completed exchange: what the user said, what the assistant answered,
/// and how it went. Append-only within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// The raw user input
    pub input: String,

    /// The assistant's reply text
    pub output: String,

    /// When the turn completed
    pub timestamp: DateTime<Utc>,

    /// Which capability produced the reply, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability_used: Option<String>,

    /// Whether the turn was answered successfully
    pub success: bool,
}

impl ChatTurn {
    pub fn new(input: impl Into<String>, output: impl Into<String>, success: bool) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            timestamp: Utc::now(),
            capability_used: None,
            success,
        }
    }

    /// Attach the capability that produced this turn's reply.
    pub fn with_capability(mut self, name: impl Into<String>) -> Self {
        self.capability_used = Some(name.into());
        self
    }
}

/// Aggregate counters for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Turns that completed with success = true
    pub successful_turns: u64,

    /// Turns that completed with success = false
    pub failed_turns: u64,

    /// Total `process()` calls answered for this session
    pub total_requests: u64,

    /// `process()` calls that ended in a failure response
    pub failed_requests: u64,

    /// Cumulative wall-clock time spent answering, in milliseconds
    pub total_elapsed_ms: u64,
}

impl SessionMetrics {
    /// Average response time across all recorded requests.
    pub fn avg_response_ms(&self) -> f64 {
        if self.total_requests == 0 {
            return 0.0;
        }
        self.total_elapsed_ms as f64 / self.total_requests as f64
    }
}

/// A conversation session: bounded turn history plus cached user context
/// for one (user, conversation) pair.
///
/// Created on the first turn for a key; destroyed only by explicit clear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub key: SessionKey,

    /// Ordered turns, oldest first, bounded to `max_history_length`
    pub turns: Vec<ChatTurn>,

    /// Cached user context (replaced wholesale on refresh)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<crate::context::UserContext>,

    pub metrics: SessionMetrics,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new(key: SessionKey) -> Self {
        let now = Utc::now();
        Self {
            key,
            turns: Vec::new(),
            context: None,
            metrics: SessionMetrics::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a turn, truncate to the most recent `max_history` entries
    /// (oldest dropped first), and recompute per-turn counters.
    pub fn push_turn(&mut self, turn: ChatTurn, max_history: usize) {
        self.turns.push(turn);
        if self.turns.len() > max_history {
            let excess = self.turns.len() - max_history;
            self.turns.drain(..excess);
        }
        self.metrics.successful_turns = self.turns.iter().filter(|t| t.success).count() as u64;
        self.metrics.failed_turns = self.turns.iter().filter(|t| !t.success).count() as u64;
        self.updated_at = Utc::now();
    }

    /// Render the last `n` turns oldest-first as `User: …` / `Assistant: …`
    /// blocks for prompt injection.
    pub fn format_recent(&self, n: usize) -> String {
        let start = self.turns.len().saturating_sub(n);
        self.turns[start..]
            .iter()
            .map(|t| format!("User: {}\nAssistant: {}", t.input, t.output))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

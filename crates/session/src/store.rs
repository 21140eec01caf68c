//! Keyed conversation session store.
//!
//! Sessions live in a `RwLock`-guarded map. Every mutation is a single lock
//! acquisition with no await inside, so appends and metric updates for one
//! key are atomic under concurrent `process()` calls. Locks are never held
//! across model or capability I/O.

use gigmate_core::turn::{ChatTurn, ConversationSession, SessionKey, SessionMetrics};
use gigmate_core::UserContext;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory store of conversation sessions, keyed by (user, conversation).
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionKey, ConversationSession>>>,
    max_history: usize,
}

impl SessionStore {
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            max_history,
        }
    }

    /// The configured history bound.
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Get a snapshot of the session, if it exists.
    pub async fn get(&self, key: &SessionKey) -> Option<ConversationSession> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Append a turn, creating the session on first use. Truncates to the
    /// most recent `max_history` turns and recomputes per-turn counters.
    pub async fn append(&self, key: &SessionKey, turn: ChatTurn) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| ConversationSession::new(key.clone()));
        session.push_turn(turn, self.max_history);
    }

    /// Record one answered request's aggregate metrics. Called exactly once
    /// per `process()` call regardless of outcome.
    pub async fn record_request(&self, key: &SessionKey, elapsed_ms: u64, failed: bool) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| ConversationSession::new(key.clone()));
        session.metrics.total_requests += 1;
        session.metrics.total_elapsed_ms += elapsed_ms;
        if failed {
            session.metrics.failed_requests += 1;
        }
    }

    /// Replace the session's cached user context wholesale.
    pub async fn set_context(&self, key: &SessionKey, context: UserContext) {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(key.clone())
            .or_insert_with(|| ConversationSession::new(key.clone()));
        session.context = Some(context);
    }

    /// The session's cached user context, if any.
    pub async fn context(&self, key: &SessionKey) -> Option<UserContext> {
        self.sessions
            .read()
            .await
            .get(key)
            .and_then(|s| s.context.clone())
    }

    /// Delete the session. Returns whether one existed.
    pub async fn clear(&self, key: &SessionKey) -> bool {
        let removed = self.sessions.write().await.remove(key).is_some();
        if removed {
            debug!(session = %key, "Cleared session");
        }
        removed
    }

    /// Render the last `n` turns oldest-first for prompt injection.
    /// Empty string when the session does not exist or has no turns.
    pub async fn format_recent(&self, key: &SessionKey, n: usize) -> String {
        self.sessions
            .read()
            .await
            .get(key)
            .map(|s| s.format_recent(n))
            .unwrap_or_default()
    }

    /// A snapshot of the session's aggregate metrics.
    pub async fn metrics(&self, key: &SessionKey) -> Option<SessionMetrics> {
        self.sessions
            .read()
            .await
            .get(key)
            .map(|s| s.metrics.clone())
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey::new("u1", "c1")
    }

    #[tokio::test]
    async fn session_created_on_first_append() {
        let store = SessionStore::new(20);
        assert!(store.get(&key()).await.is_none());

        store.append(&key(), ChatTurn::new("hi", "hello", true)).await;
        let session = store.get(&key()).await.unwrap();
        assert_eq!(session.turns.len(), 1);
    }

    #[tokio::test]
    async fn history_bounded_most_recent_last() {
        let store = SessionStore::new(5);
        for i in 0..12 {
            store
                .append(&key(), ChatTurn::new(format!("q{i}"), format!("a{i}"), true))
                .await;
        }
        let session = store.get(&key()).await.unwrap();
        assert_eq!(session.turns.len(), 5);
        assert_eq!(session.turns.last().unwrap().input, "q11");
        assert_eq!(session.turns[0].input, "q7");
    }

    #[tokio::test]
    async fn clear_deletes_session() {
        let store = SessionStore::new(20);
        store.append(&key(), ChatTurn::new("hi", "hello", true)).await;
        assert!(store.clear(&key()).await);
        assert!(store.get(&key()).await.is_none());
        assert!(!store.clear(&key()).await);
    }

    #[tokio::test]
    async fn request_metrics_accumulate() {
        let store = SessionStore::new(20);
        store.record_request(&key(), 100, false).await;
        store.record_request(&key(), 300, true).await;

        let metrics = store.metrics(&key()).await.unwrap();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.total_elapsed_ms, 400);
        assert!((metrics.avg_response_ms() - 200.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn context_roundtrip() {
        let store = SessionStore::new(20);
        assert!(store.context(&key()).await.is_none());

        store.set_context(&key(), UserContext::minimal("u1")).await;
        let ctx = store.context(&key()).await.unwrap();
        assert_eq!(ctx.user_id, "u1");
    }

    #[tokio::test]
    async fn format_recent_for_unknown_session_is_empty() {
        let store = SessionStore::new(20);
        assert_eq!(store.format_recent(&key(), 5).await, "");
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_key() {
        let store = SessionStore::new(20);
        let other = SessionKey::new("u2", "c1");
        store.append(&key(), ChatTurn::new("a", "b", true)).await;
        store.append(&other, ChatTurn::new("x", "y", false)).await;

        assert_eq!(store.get(&key()).await.unwrap().turns[0].input, "a");
        assert_eq!(store.get(&other).await.unwrap().turns[0].input, "x");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_appends_do_not_lose_turns() {
        let store = Arc::new(SessionStore::new(100));
        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .append(&key(), ChatTurn::new(format!("q{i}"), "a", true))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(store.get(&key()).await.unwrap().turns.len(), 20);
    }
}

//! Staleness-aware user context refresh.
//!
//! A pure read-through cache with one staleness horizon: context absent or
//! older than the horizon is refetched, anything fresher is reused as-is.
//! Fetch failures degrade to a minimal context and are never surfaced.

use chrono::Duration;
use gigmate_capabilities::BackendClient;
use gigmate_core::UserContext;
use gigmate_core::turn::SessionKey;
use gigmate_session::SessionStore;
use tracing::{debug, warn};

pub struct ContextManager {
    backend: BackendClient,
    staleness: Duration,
}

impl ContextManager {
    pub fn new(backend: BackendClient, staleness_secs: u64) -> Self {
        Self {
            backend,
            staleness: Duration::seconds(staleness_secs as i64),
        }
    }

    /// Return fresh context for the session, fetching or refetching as
    /// needed. Never fails: any fetch error falls back to a minimal
    /// context carrying only the user id and fetch time.
    pub async fn ensure_fresh(&self, store: &SessionStore, key: &SessionKey) -> UserContext {
        if let Some(context) = store.context(key).await {
            if context.age() <= self.staleness {
                return context;
            }
            debug!(session = %key, age_secs = context.age().num_seconds(), "Context stale, refetching");
        }

        let context = match self.backend.fetch_context().await {
            Ok(context) => context,
            Err(e) => {
                warn!(session = %key, error = %e, "Context fetch failed, using minimal context");
                UserContext::minimal(&key.user_id)
            }
        };

        store.set_context(key, context.clone()).await;
        context
    }
}

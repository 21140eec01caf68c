//! The orchestrator — Gigmate's public entrypoint.
//!
//! `Agent::process` composes context refresh, the response cache, the fast
//! path, the intent pipeline and error recovery into one request lifecycle.
//! It never returns an error: every path terminates in a well-formed
//! `AgentResponse`, and each call updates per-session request metrics
//! exactly once.

use crate::context_manager::ContextManager;
use crate::fastpath::{FastPathReply, FastPathResponder, RandomPicker};
use crate::pipeline::IntentPipeline;
use crate::recovery::RecoveryPolicy;
use gigmate_capabilities::BackendClient;
use gigmate_config::AppConfig;
use gigmate_core::capability::{CapabilityBinding, CapabilityDescriptor, CapabilityRegistry};
use gigmate_core::model::ModelClient;
use gigmate_core::turn::{ChatTurn, ConversationSession, SessionKey};
use gigmate_core::{AgentResponse, UserContext};
use gigmate_session::{ResponseCache, SessionStore};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Shown when classification picks "none" or an unregistered capability.
pub const SCOPE_MESSAGE: &str = "I can help with jobs, proposals, payments, and \
messages on your marketplace account — that request is outside what I can do right now.";

/// Shown when the classification step itself fails.
pub const GENERIC_APOLOGY: &str = "I'm sorry, I wasn't able to work out how to \
help with that. Could you try rephrasing?";

pub struct Agent {
    model: Arc<dyn ModelClient>,
    registry: RwLock<CapabilityRegistry>,
    binding: CapabilityBinding,
    sessions: Arc<SessionStore>,
    cache: Arc<ResponseCache>,
    context: ContextManager,
    fastpath: FastPathResponder,
    pipeline: IntentPipeline,
    recovery: RecoveryPolicy,
}

impl Agent {
    /// Build an agent bound to one marketplace user. The session store and
    /// cache are owned here and live as long as the agent, so conversation
    /// memory survives across `process()` calls.
    pub fn new(
        config: &AppConfig,
        model: Arc<dyn ModelClient>,
        registry: CapabilityRegistry,
        user_id: impl Into<String>,
    ) -> Self {
        let binding = CapabilityBinding {
            base_url: config.backend.base_url.clone(),
            api_token: config.backend.api_token.clone(),
            user_id: user_id.into(),
            mock: config.backend.mock,
        };

        Self {
            pipeline: IntentPipeline::new(model.clone()),
            recovery: RecoveryPolicy::new(config.retry.max_attempts, config.retry.base_delay_ms),
            context: ContextManager::new(
                BackendClient::new(&binding),
                config.context.staleness_secs,
            ),
            fastpath: FastPathResponder::new(Box::new(RandomPicker)),
            sessions: Arc::new(SessionStore::new(config.session.max_history_length)),
            cache: Arc::new(ResponseCache::new(config.cache.ttl_secs, config.cache.capacity)),
            registry: RwLock::new(registry),
            binding,
            model,
        }
    }

    /// Replace the fast-path responder (deterministic picker/clock in tests).
    pub fn with_fastpath(mut self, fastpath: FastPathResponder) -> Self {
        self.fastpath = fastpath;
        self
    }

    /// The shared session store.
    pub fn session_store(&self) -> Arc<SessionStore> {
        self.sessions.clone()
    }

    /// Discover and bind all registered capabilities. Re-running replaces
    /// prior bindings. Returns the bound descriptors.
    pub async fn initialize_capabilities(&self) -> Vec<CapabilityDescriptor> {
        let mut registry = self.registry.write().await;
        let discovered = registry.discover();
        let bound = registry.bind(&self.binding);
        info!(
            discovered = discovered.len(),
            bound, "Initialized capability registry"
        );
        registry.bound_descriptors()
    }

    /// Delete the session and purge the response cache.
    pub async fn clear_session(&self, key: &SessionKey) -> bool {
        self.cache.clear().await;
        self.sessions.clear(key).await
    }

    /// A snapshot of the session: turns, metrics, cached context.
    pub async fn session_summary(&self, key: &SessionKey) -> Option<ConversationSession> {
        self.sessions.get(key).await
    }

    /// Answer one user message. Never fails: every outcome, including
    /// internal errors, is encoded in the returned response.
    pub async fn process(&self, key: &SessionKey, input: &str) -> AgentResponse {
        let start = Instant::now();
        let mut response = self.process_inner(key, input).await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        response.elapsed_ms = elapsed_ms;
        self.sessions
            .record_request(key, elapsed_ms, !response.success)
            .await;
        response
    }

    async fn process_inner(&self, key: &SessionKey, input: &str) -> AgentResponse {
        // 1. Context refresh (never fails, degrades to minimal)
        let context = self.context.ensure_fresh(&self.sessions, key).await;

        // 2. Response cache
        if let Some(hit) = self.cache.get(input).await {
            debug!(session = %key, "Serving cached response");
            return hit.as_cached();
        }

        // 3. Fast path
        let transcript = self.sessions.format_recent(key, 5).await;
        if let Some(reply) = self.fastpath.evaluate(input, &context, &transcript) {
            let response = match reply {
                FastPathReply::ClearMemory(response) => {
                    self.sessions.clear(key).await;
                    self.cache.clear().await;
                    response
                }
                FastPathReply::Reply(response) => response,
            };
            self.sessions
                .append(key, ChatTurn::new(input, &response.message, response.success))
                .await;
            return response;
        }

        // 4. Intent resolution
        self.resolve_intent(key, input, &context, &transcript).await
    }

    async fn resolve_intent(
        &self,
        key: &SessionKey,
        input: &str,
        context: &UserContext,
        transcript: &str,
    ) -> AgentResponse {
        let catalog = self.registry.read().await.bound_descriptors();

        let decision = match self
            .pipeline
            .classify(&catalog, context, transcript, input)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                warn!(session = %key, error = %e, "Classification failed");
                let response = AgentResponse::failure(GENERIC_APOLOGY);
                self.sessions
                    .append(key, ChatTurn::new(input, GENERIC_APOLOGY, false))
                    .await;
                return response;
            }
        };

        // Guard drops before any capability I/O
        let capability = if decision.is_none() {
            None
        } else {
            self.registry.read().await.lookup(&decision.capability)
        };

        let Some(capability) = capability else {
            if !decision.is_none() {
                debug!(session = %key, capability = %decision.capability, "Unregistered capability selected");
            }
            let response = AgentResponse::failure(SCOPE_MESSAGE);
            self.sessions
                .append(key, ChatTurn::new(input, SCOPE_MESSAGE, false))
                .await;
            return response;
        };

        match self
            .recovery
            .invoke_with_retry(&capability, decision.parameters, None)
            .await
        {
            Ok(outcome) => {
                let message = outcome
                    .message
                    .clone()
                    .unwrap_or_else(|| "Done.".to_string());
                // Success is forced true when any payload exists
                let success =
                    outcome.success || outcome.message.is_some() || outcome.data.is_some();

                let mut response = AgentResponse {
                    message: message.clone(),
                    data: outcome.data,
                    success,
                    capability_used: Some(capability.name().to_string()),
                    suggestions: Vec::new(),
                    elapsed_ms: 0,
                    cached: false,
                };

                // Empty result set: nudge freelancers to keep looking
                let empty_data = response
                    .data
                    .as_ref()
                    .and_then(|d| d.as_array())
                    .is_some_and(|a| a.is_empty());
                if empty_data && context.is_freelancer() {
                    response.suggestions.push(
                        "Try broadening your filters — new jobs are posted all the time.".into(),
                    );
                }

                self.sessions
                    .append(
                        key,
                        ChatTurn::new(input, &message, success)
                            .with_capability(capability.name()),
                    )
                    .await;

                if success {
                    self.cache.put(input, response.clone()).await;
                }
                response
            }
            Err(error) => {
                warn!(session = %key, capability = capability.name(), error = %error, "Capability failed after retries");
                let (message, suggestion) = self
                    .recovery
                    .explain(&self.model, capability.name(), &error.detail())
                    .await;

                let response = AgentResponse::failure(&message)
                    .with_capability(capability.name())
                    .with_suggestions([suggestion]);

                self.sessions
                    .append(
                        key,
                        ChatTurn::new(input, &message, false).with_capability(capability.name()),
                    )
                    .await;
                response
            }
        }
    }
}

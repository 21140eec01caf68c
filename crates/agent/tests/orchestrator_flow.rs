//! End-to-end orchestrator behavior against a scripted model and the mock
//! marketplace backend.

use async_trait::async_trait;
use gigmate_agent::orchestrator::{GENERIC_APOLOGY, SCOPE_MESSAGE};
use gigmate_agent::{Agent, FastPathResponder, FixedPicker};
use gigmate_capabilities::default_registry;
use gigmate_config::AppConfig;
use gigmate_core::capability::{
    Capability, CapabilityFactory, CapabilityOutcome, CapabilityRegistry,
};
use gigmate_core::error::CapabilityError;
use gigmate_core::model::ModelClient;
use gigmate_core::turn::SessionKey;
use gigmate_core::UserContext;
use gigmate_model::MockModelClient;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.backend.mock = true;
    config.backend.api_token = Some("test-token".into());
    config.retry.base_delay_ms = 1;
    config
}

fn key() -> SessionKey {
    SessionKey::new("user-1", "conv-1")
}

fn deterministic_fastpath() -> FastPathResponder {
    FastPathResponder::new(Box::new(FixedPicker(0))).with_hour(9)
}

async fn agent_with(model: MockModelClient, registry: CapabilityRegistry) -> Agent {
    let agent = Agent::new(&test_config(), Arc::new(model), registry, "user-1")
        .with_fastpath(deterministic_fastpath());
    agent.initialize_capabilities().await;
    agent
}

/// A capability whose invocations are counted and whose outcome is fixed.
struct ScriptedCapability {
    name: &'static str,
    outcome: Result<CapabilityOutcome, CapabilityError>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Capability for ScriptedCapability {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "test capability"
    }

    async fn invoke(
        &self,
        _parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

fn scripted_registry(
    name: &'static str,
    outcome: Result<CapabilityOutcome, CapabilityError>,
) -> (CapabilityRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_handle = calls.clone();
    let mut registry = CapabilityRegistry::new();
    registry.add_factory(CapabilityFactory::new(move |_binding| {
        Box::new(ScriptedCapability {
            name,
            outcome: outcome.clone(),
            calls: calls.clone(),
        })
    }));
    (registry, calls_handle)
}

#[tokio::test]
async fn greeting_on_empty_session() {
    let agent = agent_with(MockModelClient::new(), default_registry()).await;

    let response = agent.process(&key(), "hello").await;
    assert!(response.success);
    assert!(response.message.starts_with("Good morning"));
    // Mock backend knows the user's name
    assert!(response.message.contains("Jordan Reyes"));
    assert_eq!(response.suggestions.len(), 3);
    assert!(response.capability_used.is_none());
    assert!(!response.cached);
}

#[tokio::test]
async fn identical_input_served_from_cache() {
    let model = MockModelClient::new()
        .respond(r#"{"capability": "search_jobs", "parameters": {"query": "rust"}}"#);
    let agent = agent_with(model, default_registry()).await;

    let first = agent.process(&key(), "find rust jobs").await;
    assert!(first.success);
    assert!(!first.cached);

    let second = agent.process(&key(), "Find Rust Jobs").await;
    assert!(second.cached);
    assert_eq!(second.message, first.message);
    assert_eq!(second.data, first.data);
}

#[tokio::test]
async fn none_decision_yields_scope_message() {
    let model = MockModelClient::new().respond(r#"{"capability": "none"}"#);
    let agent = agent_with(model, default_registry()).await;

    let response = agent.process(&key(), "write me a poem").await;
    assert!(!response.success);
    assert_eq!(response.message, SCOPE_MESSAGE);
    assert!(response.capability_used.is_none());
}

#[tokio::test]
async fn unregistered_capability_invokes_nothing() {
    let (registry, calls) = scripted_registry("real", Ok(CapabilityOutcome::ok("ok")));
    let model = MockModelClient::new().respond(r#"{"capability": "ghost"}"#);
    let agent = agent_with(model, registry).await;

    let response = agent.process(&key(), "do the ghost thing").await;
    assert!(!response.success);
    assert_eq!(response.message, SCOPE_MESSAGE);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_model_output_yields_generic_apology() {
    let model = MockModelClient::new().respond("I think you want job search!");
    let agent = agent_with(model, default_registry()).await;

    let response = agent.process(&key(), "find jobs").await;
    assert!(!response.success);
    assert_eq!(response.message, GENERIC_APOLOGY);
}

#[tokio::test]
async fn retriable_failure_invoked_three_times_then_explained() {
    let (registry, calls) = scripted_registry(
        "always_down",
        Err(CapabilityError::Execution {
            name: "always_down".into(),
            reason: "connection refused".into(),
        }),
    );
    let model = MockModelClient::new()
        .respond(r#"{"capability": "always_down"}"#)
        .respond("That service is briefly unavailable, sorry about that.");
    let agent = agent_with(model, registry).await;

    let response = agent.process(&key(), "check the thing").await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(!response.success);
    assert_eq!(
        response.message,
        "That service is briefly unavailable, sorry about that."
    );
    assert_eq!(response.capability_used.as_deref(), Some("always_down"));
    assert_eq!(response.suggestions.len(), 1);
}

#[tokio::test]
async fn terminal_failure_with_broken_explainer_still_answers() {
    let (registry, calls) = scripted_registry(
        "broken",
        Err(CapabilityError::Execution {
            name: "broken".into(),
            reason: "HTTP 400: bad request".into(),
        }),
    );
    // The explanation call itself fails, forcing the fixed apology path
    let model = MockModelClient::new()
        .respond(r#"{"capability": "broken"}"#)
        .fail(gigmate_core::error::ModelError::Timeout("slow".into()));
    let agent = agent_with(model, registry).await;

    let response = agent.process(&key(), "break it").await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!response.success);
    assert!(response.message.contains("try again"));
}

#[tokio::test]
async fn empty_result_nudges_freelancers() {
    let (registry, _calls) = scripted_registry(
        "empty_search",
        Ok(CapabilityOutcome {
            success: true,
            data: Some(serde_json::json!([])),
            message: Some("No matches found.".into()),
        }),
    );
    let model = MockModelClient::new().respond(r#"{"capability": "empty_search"}"#);
    let agent = agent_with(model, registry).await;

    // Mock backend context reports userType = freelancer
    let response = agent.process(&key(), "find obscure jobs").await;
    assert!(response.success);
    assert!(response
        .suggestions
        .iter()
        .any(|s| s.contains("broadening")));
}

#[tokio::test]
async fn history_is_bounded_most_recent_last() {
    let mut config = test_config();
    config.session.max_history_length = 3;
    let agent = Agent::new(
        &config,
        Arc::new(MockModelClient::new()),
        default_registry(),
        "user-1",
    )
    .with_fastpath(deterministic_fastpath());
    agent.initialize_capabilities().await;

    for i in 1..=5 {
        agent.process(&key(), &format!("thanks #{i}")).await;
    }

    let session = agent.session_summary(&key()).await.unwrap();
    assert_eq!(session.turns.len(), 3);
    assert_eq!(session.turns.last().unwrap().input, "thanks #5");
}

#[tokio::test]
async fn memory_persists_across_process_calls() {
    let agent = agent_with(MockModelClient::new(), default_registry()).await;

    agent.process(&key(), "hello").await;
    let recap = agent.process(&key(), "what did we talk about?").await;
    assert!(recap.success);
    assert!(recap.message.contains("User: hello"));
}

#[tokio::test]
async fn clear_command_resets_session_and_cache() {
    let model = MockModelClient::new()
        .respond(r#"{"capability": "search_jobs", "parameters": {}}"#);
    let agent = agent_with(model, default_registry()).await;

    agent.process(&key(), "find jobs").await;
    assert!(agent.session_summary(&key()).await.is_some());

    let response = agent.process(&key(), "clear chat").await;
    assert!(response.success);

    // History holds only the confirmation turn; earlier turns are gone
    let session = agent.session_summary(&key()).await.unwrap();
    assert_eq!(session.turns.len(), 1);
    assert_eq!(session.turns[0].input, "clear chat");
}

#[tokio::test]
async fn context_reused_then_refetched_past_horizon() {
    let agent = agent_with(MockModelClient::new(), default_registry()).await;
    let store = agent.session_store();

    // Seed a 30-minute-old context with a distinctive name
    let mut cached = UserContext::minimal("user-1");
    cached.name = Some("Cached Name".into());
    cached.fetched_at = chrono::Utc::now() - chrono::Duration::minutes(30);
    store.set_context(&key(), cached.clone()).await;

    let response = agent.process(&key(), "hello").await;
    assert!(response.message.contains("Cached Name"));

    // Age it past the horizon; the next call refetches from the backend
    cached.fetched_at = chrono::Utc::now() - chrono::Duration::minutes(61);
    store.set_context(&key(), cached).await;

    let response = agent.process(&key(), "hello again").await;
    assert!(response.message.contains("Jordan Reyes"));
}

#[tokio::test]
async fn metrics_recorded_once_per_call() {
    let model = MockModelClient::new().respond(r#"{"capability": "none"}"#);
    let agent = agent_with(model, default_registry()).await;

    agent.process(&key(), "hello").await;
    agent.process(&key(), "out of scope request").await;
    agent.process(&key(), "thanks").await;

    let metrics = agent.session_summary(&key()).await.unwrap().metrics;
    assert_eq!(metrics.total_requests, 3);
    assert_eq!(metrics.failed_requests, 1);
}

#[tokio::test]
async fn process_never_panics_on_odd_input() {
    let agent = agent_with(MockModelClient::new(), default_registry()).await;

    for input in ["", "   ", "\n\n", "🦀🦀🦀", &"x".repeat(10_000)] {
        let response = agent.process(&key(), input).await;
        assert!(!response.message.is_empty());
    }
}

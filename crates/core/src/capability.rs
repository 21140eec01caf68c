//! Capability trait and registry — the abstraction over delegated work.
//!
//! A capability is a named unit of externally delegated work (typically an
//! HTTP call against the marketplace REST backend) exposed through a uniform
//! invoke contract. The engine depends only on this three-field contract:
//! name, description, invoke.

use crate::error::CapabilityError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Static metadata about a capability, read during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub name: String,
    pub description: String,
}

/// The result of invoking a capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityOutcome {
    /// Whether the underlying operation succeeded
    pub success: bool,

    /// Structured payload, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Human-readable result text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CapabilityOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// The core Capability trait.
///
/// Implementations live in `gigmate-capabilities`; each wraps one backend
/// operation (job search, proposal status, payments, messaging, profile).
#[async_trait]
pub trait Capability: Send + Sync {
    /// The unique name of this capability (e.g., "search_jobs").
    fn name(&self) -> &str;

    /// A description of what this capability does (sent to the model).
    fn description(&self) -> &str;

    /// Invoke the capability with classifier-extracted parameters.
    async fn invoke(
        &self,
        parameters: serde_json::Value,
    ) -> std::result::Result<CapabilityOutcome, CapabilityError>;

    /// This capability's descriptor.
    fn descriptor(&self) -> CapabilityDescriptor {
        CapabilityDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// Runtime configuration handed to capability constructors.
///
/// `probe()` produces a side-effect-free binding used only to read
/// name/description during discovery.
#[derive(Debug, Clone)]
pub struct CapabilityBinding {
    /// Base URL of the marketplace REST backend
    pub base_url: String,

    /// Bearer token for authenticated endpoints
    pub api_token: Option<String>,

    /// The user this binding acts on behalf of
    pub user_id: String,

    /// When set, capabilities return canned fixture data instead of
    /// performing HTTP calls
    pub mock: bool,
}

impl CapabilityBinding {
    /// A binding safe for dry-run instantiation: mock on, no credential.
    pub fn probe() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            user_id: String::new(),
            mock: true,
        }
    }
}

/// A registration-table entry: constructs one capability from a binding.
///
/// This is the explicit replacement for reflection-based plugin discovery:
/// the table is built once at startup and is the single source of candidates.
pub struct CapabilityFactory {
    constructor: Box<dyn Fn(&CapabilityBinding) -> Box<dyn Capability> + Send + Sync>,
}

impl CapabilityFactory {
    pub fn new<F>(constructor: F) -> Self
    where
        F: Fn(&CapabilityBinding) -> Box<dyn Capability> + Send + Sync + 'static,
    {
        Self {
            constructor: Box::new(constructor),
        }
    }

    fn construct(&self, binding: &CapabilityBinding) -> Box<dyn Capability> {
        (self.constructor)(binding)
    }
}

/// A registry of capabilities: a factory table plus the currently bound
/// name→instance map.
///
/// The orchestrator uses this to:
/// 1. Describe available capabilities to the classifier
/// 2. Look up and invoke the capability the classifier selected
pub struct CapabilityRegistry {
    factories: Vec<CapabilityFactory>,
    bound: HashMap<String, Arc<dyn Capability>>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            bound: HashMap::new(),
        }
    }

    /// Add a factory to the registration table.
    pub fn add_factory(&mut self, factory: CapabilityFactory) {
        self.factories.push(factory);
    }

    /// Dry-run every factory to read descriptors. Candidates with an empty
    /// name are skipped with a warning; discovery is best-effort and partial
    /// failure never aborts startup.
    pub fn discover(&self) -> Vec<CapabilityDescriptor> {
        let probe = CapabilityBinding::probe();
        let mut descriptors = Vec::new();
        for factory in &self.factories {
            let candidate = factory.construct(&probe);
            let descriptor = candidate.descriptor();
            if descriptor.name.trim().is_empty() {
                warn!("Skipping capability candidate with empty name");
                continue;
            }
            debug!(capability = %descriptor.name, "Discovered capability");
            descriptors.push(descriptor);
        }
        descriptors
    }

    /// Construct live instances and republish the name→instance map.
    /// Re-running replaces all prior bindings; on duplicate names the last
    /// registration wins.
    pub fn bind(&mut self, binding: &CapabilityBinding) -> usize {
        let mut bound: HashMap<String, Arc<dyn Capability>> = HashMap::new();
        for factory in &self.factories {
            let instance = factory.construct(binding);
            let name = instance.name().to_string();
            if name.trim().is_empty() {
                warn!("Skipping capability with empty name at bind time");
                continue;
            }
            bound.insert(name, Arc::from(instance));
        }
        let count = bound.len();
        self.bound = bound;
        debug!(count, "Bound capability registry");
        count
    }

    /// Look up a bound capability by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.bound.get(name).cloned()
    }

    /// Descriptors of all currently bound capabilities.
    pub fn bound_descriptors(&self) -> Vec<CapabilityDescriptor> {
        let mut descriptors: Vec<_> = self.bound.values().map(|c| c.descriptor()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Names of all currently bound capabilities.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.bound.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoCapability {
        name: String,
    }

    #[async_trait]
    impl Capability for EchoCapability {
        fn name(&self) -> &str {
            &self.name
        }

        fn description(&self) -> &str {
            "Echoes back the input"
        }

        async fn invoke(
            &self,
            parameters: serde_json::Value,
        ) -> Result<CapabilityOutcome, CapabilityError> {
            let text = parameters["text"].as_str().unwrap_or("").to_string();
            Ok(CapabilityOutcome::ok(text))
        }
    }

    fn echo_factory(name: &'static str) -> CapabilityFactory {
        CapabilityFactory::new(move |_binding| {
            Box::new(EchoCapability { name: name.into() })
        })
    }

    #[test]
    fn discover_reads_descriptors() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory("echo"));
        let descriptors = registry.discover();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "echo");
    }

    #[test]
    fn discover_skips_empty_names() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory(""));
        registry.add_factory(echo_factory("valid"));
        let descriptors = registry.discover();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name, "valid");
    }

    #[test]
    fn bind_and_lookup() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory("echo"));
        let count = registry.bind(&CapabilityBinding::probe());
        assert_eq!(count, 1);
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("nonexistent").is_none());
    }

    #[test]
    fn rebind_replaces_prior_bindings() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory("echo"));
        registry.bind(&CapabilityBinding::probe());
        registry.bind(&CapabilityBinding::probe());
        assert_eq!(registry.names(), vec!["echo".to_string()]);
    }

    #[test]
    fn duplicate_names_last_wins() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory("dup"));
        registry.add_factory(echo_factory("dup"));
        let count = registry.bind(&CapabilityBinding::probe());
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn invoke_bound_capability() {
        let mut registry = CapabilityRegistry::new();
        registry.add_factory(echo_factory("echo"));
        registry.bind(&CapabilityBinding::probe());

        let capability = registry.lookup("echo").unwrap();
        let outcome = capability
            .invoke(serde_json::json!({"text": "hello world"}))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("hello world"));
    }
}

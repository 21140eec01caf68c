//! # Gigmate Core
//!
//! Domain types, traits, and error definitions for the Gigmate assistant
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod capability;
pub mod context;
pub mod error;
pub mod model;
pub mod response;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use capability::{
    Capability, CapabilityBinding, CapabilityDescriptor, CapabilityFactory, CapabilityOutcome,
    CapabilityRegistry,
};
pub use context::UserContext;
pub use error::{CapabilityError, ContextError, Error, ModelError, Result, SessionError};
pub use model::ModelClient;
pub use response::AgentResponse;
pub use turn::{ChatTurn, ConversationSession, SessionKey, SessionMetrics};

//! The conversation orchestration engine — the heart of Gigmate.
//!
//! One `process()` call flows through a fixed lifecycle:
//!
//! 1. **Refresh context** — reuse the session's cached user context or
//!    refetch it past the staleness horizon
//! 2. **Check the response cache** — recent identical input is answered
//!    immediately with `cached = true`
//! 3. **Fast path** — greetings, gratitude, small talk, history recaps and
//!    memory commands get templated replies without touching the model
//! 4. **Intent resolution** — one classification call to the generative
//!    model selects a capability (or "none"), which is invoked with retry
//! 5. **Recovery** — capability failures become one friendly explanation
//!    sentence; nothing above the orchestrator ever raises
//!
//! Every outcome lands in session history and per-session metrics.

pub mod context_manager;
pub mod fastpath;
pub mod orchestrator;
pub mod pipeline;
pub mod recovery;

pub use context_manager::ContextManager;
pub use fastpath::{FastPathReply, FastPathResponder, FixedPicker, PhrasePicker, RandomPicker};
pub use orchestrator::Agent;
pub use pipeline::{IntentDecision, IntentPipeline};
pub use recovery::RecoveryPolicy;

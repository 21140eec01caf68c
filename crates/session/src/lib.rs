//! Session store and response cache for Gigmate.
//!
//! Both are keyed in-memory stores behind async locks, owned by the
//! long-lived agent and shared via `Arc`. Conversation memory therefore
//! survives repeated `process()` calls; it resets only on explicit clear
//! or process restart.

pub mod cache;
pub mod store;

pub use cache::ResponseCache;
pub use store::SessionStore;

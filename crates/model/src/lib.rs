//! Generative-model client implementations for Gigmate.
//!
//! `OpenAiModelClient` talks to any OpenAI-compatible `/chat/completions`
//! endpoint. `MockModelClient` serves scripted responses for tests.
//! Both call sites (intent classification, failure explanation) share one
//! client; their failure semantics live in `gigmate-agent`.

pub mod mock;
pub mod openai;

pub use mock::MockModelClient;
pub use openai::OpenAiModelClient;

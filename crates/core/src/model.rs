//! ModelClient trait — the abstraction over the generative model.
//!
//! One underlying client serves both call sites: intent classification (a
//! structured prompt, result parsed as JSON) and failure explanation (a
//! template rendered with variables, result used as-is). Their failure
//! semantics are independent and live in `gigmate-agent`, not here.

use crate::error::ModelError;
use async_trait::async_trait;
use std::collections::HashMap;

/// The core generative-model client trait.
///
/// Single blocking call, no streaming, no partial results.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// A human-readable name for this client (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a prompt and return the model's text.
    async fn invoke(&self, prompt: &str) -> std::result::Result<String, ModelError>;

    /// Render a `{key}` template with the given variables and invoke the
    /// model with the result. Used by the explanation path.
    async fn invoke_template(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> std::result::Result<String, ModelError> {
        let mut prompt = template.to_string();
        for (key, value) in variables {
            prompt = prompt.replace(&format!("{{{key}}}"), value);
        }
        self.invoke(&prompt).await
    }
}

//! Error recovery: retry classification, bounded backoff, and friendly
//! failure explanation.
//!
//! Retries are a bounded loop with an explicit attempt counter, not
//! recursion, so the ceiling is independently testable and the stack stays
//! flat. Only transient faults are retried; everything else is terminal on
//! the first attempt.

use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;
use gigmate_core::model::ModelClient;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Markers whose presence in an error text makes the fault transient.
const TRANSIENT_MARKERS: &[&str] = &[
    "connection refused",
    "econnrefused",
    "timed out",
    "timeout",
    "dns",
    "network error",
    "429",
    "502",
    "503",
];

/// Whether an error text describes a transient fault worth retrying.
pub fn is_retriable(error_text: &str) -> bool {
    let lower = error_text.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|m| lower.contains(m))
}

const GENERIC_EXPLANATION: &str =
    "I ran into a problem completing that request. Please try again in a moment.";

const EXPLANATION_TEMPLATE: &str = "\
A marketplace assistant tried to use its \"{name}\" capability and it failed \
with this technical error: {error}\n\
Write one short, friendly sentence explaining the problem to a non-technical \
user. Do not mention error codes or internals.";

pub struct RecoveryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RecoveryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Invoke a capability with identical parameters up to `max_attempts`
    /// times. The delay before attempt n scales linearly with n. When a
    /// `deadline` is supplied, pending sleeps are abandoned once it passes
    /// and the last error is returned.
    pub async fn invoke_with_retry(
        &self,
        capability: &Arc<dyn Capability>,
        parameters: serde_json::Value,
        deadline: Option<Instant>,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match capability.invoke(parameters.clone()).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) => {
                    let text = error.detail();
                    if attempt >= self.max_attempts || !is_retriable(&text) {
                        return Err(error);
                    }

                    let delay = self.base_delay * attempt;
                    if let Some(deadline) = deadline {
                        if Instant::now() + delay >= deadline {
                            warn!(
                                capability = capability.name(),
                                attempt, "Deadline reached, abandoning retries"
                            );
                            return Err(error);
                        }
                    }

                    debug!(
                        capability = capability.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %text,
                        "Transient capability failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Produce a one-sentence friendly explanation for a capability
    /// failure, plus one suggested action. Falls back to a fixed apology
    /// if the explanation call itself fails; this path never errors.
    pub async fn explain(
        &self,
        model: &Arc<dyn ModelClient>,
        capability_name: &str,
        error_text: &str,
    ) -> (String, String) {
        let mut variables = HashMap::new();
        variables.insert("name".to_string(), capability_name.to_string());
        variables.insert("error".to_string(), error_text.to_string());

        let message = match model
            .invoke_template(EXPLANATION_TEMPLATE, &variables)
            .await
        {
            Ok(sentence) if !sentence.trim().is_empty() => sentence.trim().to_string(),
            Ok(_) => GENERIC_EXPLANATION.to_string(),
            Err(e) => {
                warn!(capability = capability_name, error = %e, "Explanation call failed");
                GENERIC_EXPLANATION.to_string()
            }
        };

        (message, "Please try again in a moment.".to_string())
    }
}

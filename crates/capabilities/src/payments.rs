//! Payment summary capability.

use crate::backend::BackendClient;
use async_trait::async_trait;
use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;

pub struct PaymentSummaryCapability {
    backend: BackendClient,
}

impl PaymentSummaryCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for PaymentSummaryCapability {
    fn name(&self) -> &str {
        "payment_summary"
    }

    fn description(&self) -> &str {
        "Summarize the user's payments: released and pending amounts. \
         No parameters required."
    }

    async fn invoke(
        &self,
        _parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let payments = self
            .backend
            .get(
                "/api/payments",
                &[("userId", self.backend.user_id().to_string())],
            )
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        let (released, pending) = payments
            .as_array()
            .map(|items| {
                items.iter().fold((0.0, 0.0), |(rel, pen), p| {
                    let amount = p["amount"].as_f64().unwrap_or(0.0);
                    match p["status"].as_str() {
                        Some("released") => (rel + amount, pen),
                        Some("pending") => (rel, pen + amount),
                        _ => (rel, pen),
                    }
                })
            })
            .unwrap_or((0.0, 0.0));

        let message = if released == 0.0 && pending == 0.0 {
            "You have no recorded payments yet.".to_string()
        } else {
            format!("You've received ${released:.2} so far, with ${pending:.2} pending.")
        };

        Ok(CapabilityOutcome {
            success: true,
            data: Some(payments),
            message: Some(message),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigmate_core::capability::CapabilityBinding;

    #[tokio::test]
    async fn summarizes_released_and_pending() {
        let capability = PaymentSummaryCapability::new(BackendClient::new(&CapabilityBinding {
            base_url: String::new(),
            api_token: None,
            user_id: "u1".into(),
            mock: true,
        }));
        let outcome = capability.invoke(serde_json::json!({})).await.unwrap();
        assert!(outcome.success);
        let message = outcome.message.unwrap();
        assert!(message.contains("$1200.00"));
        assert!(message.contains("$800.00"));
    }
}

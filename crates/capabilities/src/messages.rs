//! Direct-message capability.

use crate::backend::BackendClient;
use async_trait::async_trait;
use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;

pub struct SendMessageCapability {
    backend: BackendClient,
}

impl SendMessageCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for SendMessageCapability {
    fn name(&self) -> &str {
        "send_message"
    }

    fn description(&self) -> &str {
        "Send a direct message to another marketplace user. Parameters: \
         recipient_id (required), text (required)."
    }

    async fn invoke(
        &self,
        parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let recipient = parameters["recipient_id"]
            .as_str()
            .ok_or_else(|| CapabilityError::InvalidParameters("recipient_id is required".into()))?;
        let text = parameters["text"]
            .as_str()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| CapabilityError::InvalidParameters("text is required".into()))?;

        let body = serde_json::json!({
            "senderId": self.backend.user_id(),
            "recipientId": recipient,
            "text": text,
        });

        let result = self
            .backend
            .post("/api/messages", body)
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        Ok(CapabilityOutcome {
            success: true,
            data: Some(result),
            message: Some(format!("Message sent to {recipient}.")),
        })
    }
}

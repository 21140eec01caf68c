//! Proposal capabilities: status lookup and submission.

use crate::backend::BackendClient;
use async_trait::async_trait;
use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;

pub struct ProposalStatusCapability {
    backend: BackendClient,
}

impl ProposalStatusCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for ProposalStatusCapability {
    fn name(&self) -> &str {
        "proposal_status"
    }

    fn description(&self) -> &str {
        "List the user's submitted proposals and their current status \
         (pending, accepted, rejected). No parameters required."
    }

    async fn invoke(
        &self,
        _parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let proposals = self
            .backend
            .get(
                "/api/proposals",
                &[("userId", self.backend.user_id().to_string())],
            )
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        let count = proposals.as_array().map(|a| a.len()).unwrap_or(0);
        let message = match count {
            0 => "You haven't submitted any proposals yet.".to_string(),
            1 => "You have 1 proposal on file.".to_string(),
            n => format!("You have {n} proposals on file."),
        };

        Ok(CapabilityOutcome {
            success: true,
            data: Some(proposals),
            message: Some(message),
        })
    }
}

pub struct SubmitProposalCapability {
    backend: BackendClient,
}

impl SubmitProposalCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for SubmitProposalCapability {
    fn name(&self) -> &str {
        "submit_proposal"
    }

    fn description(&self) -> &str {
        "Submit a proposal for a job. Parameters: job_id (required), \
         cover_letter (text), bid_amount (number)."
    }

    async fn invoke(
        &self,
        parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let job_id = parameters["job_id"]
            .as_str()
            .ok_or_else(|| CapabilityError::InvalidParameters("job_id is required".into()))?;

        let body = serde_json::json!({
            "jobId": job_id,
            "userId": self.backend.user_id(),
            "coverLetter": parameters["cover_letter"].as_str().unwrap_or(""),
            "bidAmount": parameters["bid_amount"].as_f64(),
        });

        let result = self
            .backend
            .post("/api/proposals", body)
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        Ok(CapabilityOutcome {
            success: true,
            data: Some(result),
            message: Some(format!("Your proposal for job {job_id} has been submitted.")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gigmate_core::capability::CapabilityBinding;

    fn backend() -> BackendClient {
        BackendClient::new(&CapabilityBinding {
            base_url: String::new(),
            api_token: None,
            user_id: "u1".into(),
            mock: true,
        })
    }

    #[tokio::test]
    async fn status_lists_proposals() {
        let outcome = ProposalStatusCapability::new(backend())
            .invoke(serde_json::json!({}))
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(outcome.message.unwrap().contains("proposal"));
    }

    #[tokio::test]
    async fn submit_requires_job_id() {
        let err = SubmitProposalCapability::new(backend())
            .invoke(serde_json::json!({ "cover_letter": "hi" }))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidParameters(_)));
    }

    #[tokio::test]
    async fn submit_with_job_id_succeeds() {
        let outcome = SubmitProposalCapability::new(backend())
            .invoke(serde_json::json!({ "job_id": "job-101", "bid_amount": 4200 }))
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(outcome.message.unwrap().contains("job-101"));
    }
}

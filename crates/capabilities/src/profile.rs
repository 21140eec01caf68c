//! Profile lookup capability.

use crate::backend::BackendClient;
use async_trait::async_trait;
use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;

pub struct MyProfileCapability {
    backend: BackendClient,
}

impl MyProfileCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for MyProfileCapability {
    fn name(&self) -> &str {
        "my_profile"
    }

    fn description(&self) -> &str {
        "Fetch the user's own marketplace profile (name, role, skills, rate). \
         No parameters required."
    }

    async fn invoke(
        &self,
        _parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let profile = self
            .backend
            .get("/api/users/me", &[])
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        let message = match profile["name"].as_str() {
            Some(name) => format!("Here's your profile, {name}."),
            None => "Here's your profile.".to_string(),
        };

        Ok(CapabilityOutcome {
            success: true,
            data: Some(profile),
            message: Some(message),
        })
    }
}

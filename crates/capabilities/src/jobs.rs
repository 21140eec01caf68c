//! Job search capability.

use crate::backend::BackendClient;
use async_trait::async_trait;
use gigmate_core::capability::{Capability, CapabilityOutcome};
use gigmate_core::error::CapabilityError;

pub struct SearchJobsCapability {
    backend: BackendClient,
}

impl SearchJobsCapability {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Capability for SearchJobsCapability {
    fn name(&self) -> &str {
        "search_jobs"
    }

    fn description(&self) -> &str {
        "Search open jobs on the marketplace. Parameters: query (free-text keywords), \
         skills (list of skill names), min_budget and max_budget (numbers)."
    }

    async fn invoke(
        &self,
        parameters: serde_json::Value,
    ) -> Result<CapabilityOutcome, CapabilityError> {
        let mut query: Vec<(&str, String)> = Vec::new();

        if let Some(text) = parameters["query"].as_str() {
            query.push(("q", text.to_string()));
        }
        if let Some(skills) = parameters["skills"].as_array() {
            let joined = skills
                .iter()
                .filter_map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(",");
            if !joined.is_empty() {
                query.push(("skills", joined));
            }
        }
        if let Some(min) = parameters["min_budget"].as_f64() {
            query.push(("minBudget", min.to_string()));
        }
        if let Some(max) = parameters["max_budget"].as_f64() {
            query.push(("maxBudget", max.to_string()));
        }

        let jobs = self
            .backend
            .get("/api/jobs", &query)
            .await
            .map_err(|e| CapabilityError::Execution {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        let count = jobs.as_array().map(|a| a.len()).unwrap_or(0);
        let message = match count {
            0 => "I didn't find any jobs matching those filters.".to_string(),
            1 => "I found 1 job matching your search.".to_string(),
            n => format!("I found {n} jobs matching your search."),
        };

        Ok(CapabilityOutcome {
            success: true,
            data: Some(jobs),
            message: Some(message),
        })
    }
}

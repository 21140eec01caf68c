//! Shared HTTP client for the marketplace REST backend.
//!
//! Every built-in capability and the context manager go through this one
//! client. In mock mode no network calls are made: requests are answered
//! from canned marketplace fixtures keyed on path and method, so the whole
//! engine can run end-to-end offline.

use gigmate_core::capability::CapabilityBinding;
use gigmate_core::context::UserContext;
use gigmate_core::error::ContextError;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

/// A backend request failure. The text is fed to the retry classifier and
/// the explanation prompt, so transient faults keep their original wording
/// ("connection refused", "HTTP 502", …).
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

/// HTTP client bound to one user against the marketplace backend.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    api_token: Option<String>,
    user_id: String,
    mock: bool,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(binding: &CapabilityBinding) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            base_url: binding.base_url.trim_end_matches('/').to_string(),
            api_token: binding.api_token.clone(),
            user_id: binding.user_id.clone(),
            mock: binding.mock,
            client,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn has_token(&self) -> bool {
        self.api_token.is_some()
    }

    /// GET a backend path with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, BackendError> {
        if self.mock {
            return Ok(mock_response(path, "GET", &self.user_id));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Backend GET");

        let mut request = self.client.get(&url).query(query);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError(e.to_string()))?;
        Self::read_json(response).await
    }

    /// POST a JSON body to a backend path.
    pub async fn post(&self, path: &str, body: Value) -> Result<Value, BackendError> {
        if self.mock {
            return Ok(mock_response(path, "POST", &self.user_id));
        }

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "Backend POST");

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Backend returned error");
            return Err(BackendError(format!("HTTP {status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| BackendError(format!("invalid JSON from backend: {e}")))
    }

    /// Fetch the calling user's context.
    ///
    /// With a credential this hits the authenticated profile endpoint;
    /// without one it best-effort matches the user id against the public
    /// listing. Callers treat any `Err` as "fall back to minimal context".
    pub async fn fetch_context(&self) -> Result<UserContext, ContextError> {
        if self.has_token() {
            let profile = self
                .get("/api/users/me", &[])
                .await
                .map_err(|e| ContextError::FetchFailed(e.to_string()))?;
            return Ok(context_from_profile(&self.user_id, profile));
        }

        let listing = self
            .get("/api/users", &[])
            .await
            .map_err(|e| ContextError::FetchFailed(e.to_string()))?;

        let matched = listing
            .as_array()
            .and_then(|users| {
                users
                    .iter()
                    .find(|u| {
                        u["id"].as_str() == Some(self.user_id.as_str())
                            || u["id"].to_string() == self.user_id
                    })
                    .cloned()
            })
            .ok_or_else(|| {
                ContextError::FetchFailed(format!("no public profile for {}", self.user_id))
            })?;

        Ok(context_from_profile(&self.user_id, matched))
    }
}

/// Build a `UserContext` snapshot from a backend profile payload.
fn context_from_profile(user_id: &str, profile: Value) -> UserContext {
    let mut context = UserContext::minimal(user_id);
    context.user_type = profile["userType"]
        .as_str()
        .or_else(|| profile["user_type"].as_str())
        .map(String::from);
    context.name = profile["name"]
        .as_str()
        .or_else(|| profile["fullName"].as_str())
        .map(String::from);
    context.profile = Some(profile);
    context
}

/// Canned fixtures for mock mode, keyed on path and method.
fn mock_response(path: &str, method: &str, user_id: &str) -> Value {
    match (path, method) {
        ("/api/users/me", "GET") => json!({
            "id": user_id,
            "name": "Jordan Reyes",
            "userType": "freelancer",
            "skills": ["rust", "backend", "api design"],
            "hourlyRate": 65
        }),
        ("/api/users", "GET") => json!([
            { "id": user_id, "name": "Jordan Reyes", "userType": "freelancer" },
            { "id": "client-17", "name": "Mora Studio", "userType": "client" }
        ]),
        ("/api/jobs", "GET") => json!([
            {
                "id": "job-101",
                "title": "Rust backend engineer for payments service",
                "budget": 4500,
                "skills": ["rust", "postgres"],
                "status": "open"
            },
            {
                "id": "job-102",
                "title": "API integration for marketplace dashboard",
                "budget": 1800,
                "skills": ["rest", "typescript"],
                "status": "open"
            }
        ]),
        ("/api/proposals", "GET") => json!([
            {
                "id": "prop-31",
                "jobId": "job-101",
                "status": "pending",
                "bidAmount": 4200,
                "submittedAt": "2026-08-20T10:15:00Z"
            }
        ]),
        ("/api/proposals", "POST") => json!({
            "id": "prop-90",
            "status": "submitted",
            "message": "Proposal submitted successfully"
        }),
        ("/api/payments", "GET") => json!([
            { "id": "pay-7", "amount": 1200, "status": "released", "jobId": "job-89" },
            { "id": "pay-8", "amount": 800, "status": "pending", "jobId": "job-101" }
        ]),
        ("/api/messages", "POST") => json!({
            "id": "msg-55",
            "delivered": true
        }),
        _ => json!({ "error": "no fixture for this route" }),
    }
}

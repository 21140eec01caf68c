//! User context snapshot.
//!
//! A `UserContext` is a point-in-time view of who the engine is talking to.
//! It is replaced wholesale on refresh, never partially mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A snapshot of the calling user's profile, with its fetch timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,

    /// Marketplace role, e.g. "freelancer" or "client"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    /// Display name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Raw profile payload from the backend, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,

    /// When this snapshot was fetched
    pub fetched_at: DateTime<Utc>,
}

impl UserContext {
    /// The minimal fallback context: identifier and fetch time only.
    /// Used whenever a profile fetch fails for any reason.
    pub fn minimal(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_type: None,
            name: None,
            profile: None,
            fetched_at: Utc::now(),
        }
    }

    /// Age of this snapshot.
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.fetched_at
    }

    /// Whether the context indicates a freelancer role.
    pub fn is_freelancer(&self) -> bool {
        self.user_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("freelancer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_carries_only_identity() {
        let ctx = UserContext::minimal("u42");
        assert_eq!(ctx.user_id, "u42");
        assert!(ctx.user_type.is_none());
        assert!(ctx.name.is_none());
        assert!(ctx.profile.is_none());
    }

    #[test]
    fn freelancer_check_is_case_insensitive() {
        let mut ctx = UserContext::minimal("u1");
        assert!(!ctx.is_freelancer());
        ctx.user_type = Some("Freelancer".into());
        assert!(ctx.is_freelancer());
        ctx.user_type = Some("client".into());
        assert!(!ctx.is_freelancer());
    }

    #[test]
    fn fresh_snapshot_has_near_zero_age() {
        let ctx = UserContext::minimal("u1");
        assert!(ctx.age() < chrono::Duration::seconds(5));
    }
}

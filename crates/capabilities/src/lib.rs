//! Built-in capability implementations for Gigmate.
//!
//! Each capability wraps one marketplace backend operation behind the
//! uniform name/description/invoke contract. The registration table here is
//! the single source of capability candidates: the registry dry-runs it for
//! discovery and re-runs it with a live binding to (re)bind instances.

pub mod backend;
pub mod jobs;
pub mod messages;
pub mod payments;
pub mod profile;
pub mod proposals;

pub use backend::{BackendClient, BackendError};

use gigmate_core::capability::{CapabilityFactory, CapabilityRegistry};

use crate::jobs::SearchJobsCapability;
use crate::messages::SendMessageCapability;
use crate::payments::PaymentSummaryCapability;
use crate::profile::MyProfileCapability;
use crate::proposals::{ProposalStatusCapability, SubmitProposalCapability};

/// Create the default capability registry with all built-in capabilities.
pub fn default_registry() -> CapabilityRegistry {
    let mut registry = CapabilityRegistry::new();
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(SearchJobsCapability::new(BackendClient::new(binding)))
    }));
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(ProposalStatusCapability::new(BackendClient::new(binding)))
    }));
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(SubmitProposalCapability::new(BackendClient::new(binding)))
    }));
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(PaymentSummaryCapability::new(BackendClient::new(binding)))
    }));
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(SendMessageCapability::new(BackendClient::new(binding)))
    }));
    registry.add_factory(CapabilityFactory::new(|binding| {
        Box::new(MyProfileCapability::new(BackendClient::new(binding)))
    }));
    registry
}

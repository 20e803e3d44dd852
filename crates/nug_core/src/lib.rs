//! Core of the Nug admin façade.
//! Decodes admin-protocol attribute records into typed entities and
//! orchestrates domain/cos/account operations for the REST layer.

pub mod admin;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;

pub use admin::memory::InMemoryAdmin;
pub use admin::soap::parse_records;
pub use admin::{AccountAdmin, AdminError, AdminResult, CosAdmin, DomainAdmin};
pub use config::ServiceConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{AttributeEntity, AttributeValue, DecodeError, Mapping};
pub use model::record::RawRecord;
pub use model::resource::{Account, Cos, Domain, Resource, ResourceKind};
pub use model::validation::{RuleValidator, ValidationError, Validator, Violation};
pub use service::links::SubresourceLinks;
pub use service::resource_service::{
    prepare_domain, ResourceService, ServiceError, ServiceResult,
};

/// Minimal health-check API for smoke probes.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

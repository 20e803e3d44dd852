//! Derived subresource links.
//!
//! Links are computed at response-preparation time from the entity id and
//! default class of service; the remote service never stores them.

use crate::config::ServiceConfig;
use crate::model::entity::Mapping;
pub use crate::model::entity::SUBRESOURCES_KEY;
use crate::model::resource::{Domain, Resource};
use serde_json::Value;

/// Builds link sets under one configured root.
#[derive(Debug, Clone)]
pub struct SubresourceLinks {
    root: String,
}

impl SubresourceLinks {
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            root: config.link_root().to_string(),
        }
    }

    /// Links for one domain: detail, account list, and default cos if set.
    pub fn for_domain(&self, domain: &Domain) -> Mapping {
        let id = domain.id();
        let mut links = Mapping::new();
        links.insert(
            "detail".to_string(),
            Value::String(format!("{}/domain/{id}/", self.root)),
        );
        links.insert(
            "account_list".to_string(),
            Value::String(format!("{}/domain/{id}/account/", self.root)),
        );
        if let Some(cos_id) = domain.default_cos_id() {
            links.insert(
                "default_cos".to_string(),
                Value::String(format!("{}/cos/{cos_id}", self.root)),
            );
        }
        links
    }
}

impl Default for SubresourceLinks {
    fn default() -> Self {
        Self::new(&ServiceConfig::default())
    }
}

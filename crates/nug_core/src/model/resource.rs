//! Resource kinds fronted by the façade.
//!
//! Domains, classes of service and accounts share the decoding mechanics of
//! `AttributeEntity`; they differ only in which attributes matter to callers.

use crate::model::entity::{AttributeEntity, DecodeError, Mapping};
use crate::model::record::RawRecord;
use crate::model::validation::{ValidationError, Validator};
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Admin-protocol attribute holding a domain's default class of service.
pub const DOMAIN_DEFAULT_COS_KEY: &str = "zimbraDomainDefaultCOSId";
/// Short alias accepted for the default class of service.
pub const DEFAULT_COS_ALIAS_KEY: &str = "defaultCosId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Domain,
    Cos,
    Account,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Cos => "cos",
            Self::Account => "account",
        }
    }

    /// Parses the lowercase kind name used in links and CLI arguments.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "domain" => Some(Self::Domain),
            "cos" => Some(Self::Cos),
            "account" => Some(Self::Account),
            _ => None,
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of the typed resource wrappers.
pub trait Resource: Sized {
    const KIND: ResourceKind;

    fn from_entity(entity: AttributeEntity) -> Self;
    fn entity(&self) -> &AttributeEntity;

    fn decode(record: &RawRecord) -> Result<Self, DecodeError> {
        AttributeEntity::decode(record).map(Self::from_entity)
    }

    fn from_payload(payload: &Mapping) -> Result<Self, DecodeError> {
        AttributeEntity::from_payload(payload).map(Self::from_entity)
    }

    fn id(&self) -> &str {
        self.entity().id()
    }

    fn name(&self) -> &str {
        self.entity().name()
    }

    fn validate(&self, validator: &dyn Validator) -> Result<(), ValidationError> {
        self.entity().validate(Self::KIND, validator)
    }
}

/// Mail domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain(AttributeEntity);

impl Domain {
    /// Default class of service id, when set and non-empty.
    pub fn default_cos_id(&self) -> Option<&str> {
        let non_empty = |key: &str| self.0.get_text(key).filter(|value| !value.is_empty());
        non_empty(DOMAIN_DEFAULT_COS_KEY).or_else(|| non_empty(DEFAULT_COS_ALIAS_KEY))
    }
}

/// Class of service: a named bundle of account defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cos(AttributeEntity);

/// Mail account addressed as `local@domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account(AttributeEntity);

impl Account {
    /// Domain part of the account address.
    pub fn domain_name(&self) -> Option<&str> {
        self.0
            .name()
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
    }
}

impl Resource for Domain {
    const KIND: ResourceKind = ResourceKind::Domain;

    fn from_entity(entity: AttributeEntity) -> Self {
        Self(entity)
    }

    fn entity(&self) -> &AttributeEntity {
        &self.0
    }
}

impl Resource for Cos {
    const KIND: ResourceKind = ResourceKind::Cos;

    fn from_entity(entity: AttributeEntity) -> Self {
        Self(entity)
    }

    fn entity(&self) -> &AttributeEntity {
        &self.0
    }
}

impl Resource for Account {
    const KIND: ResourceKind = ResourceKind::Account;

    fn from_entity(entity: AttributeEntity) -> Self {
        Self(entity)
    }

    fn entity(&self) -> &AttributeEntity {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, Domain, Resource, ResourceKind};
    use crate::model::record::RawRecord;

    #[test]
    fn default_cos_id_prefers_protocol_attribute_and_skips_empty() {
        let domain = Domain::decode(
            &RawRecord::new("d1", "example.com")
                .with_attr("defaultCosId", "alias")
                .with_attr("zimbraDomainDefaultCOSId", "c9"),
        )
        .unwrap();
        assert_eq!(domain.default_cos_id(), Some("c9"));

        let empty = Domain::decode(
            &RawRecord::new("d2", "example.org").with_attr("zimbraDomainDefaultCOSId", ""),
        )
        .unwrap();
        assert_eq!(empty.default_cos_id(), None);

        let empty_protocol_with_alias = Domain::decode(
            &RawRecord::new("d3", "example.net")
                .with_attr("zimbraDomainDefaultCOSId", "")
                .with_attr("defaultCosId", "c9"),
        )
        .unwrap();
        assert_eq!(empty_protocol_with_alias.default_cos_id(), Some("c9"));
    }

    #[test]
    fn account_domain_name_uses_last_at_sign() {
        let account = Account::decode(&RawRecord::new("a1", "alice@example.com")).unwrap();
        assert_eq!(account.domain_name(), Some("example.com"));

        let bare = Account::decode(&RawRecord::new("a2", "alice")).unwrap();
        assert_eq!(bare.domain_name(), None);
    }

    #[test]
    fn kind_parse_accepts_mixed_case() {
        assert_eq!(ResourceKind::parse(" Domain "), Some(ResourceKind::Domain));
        assert_eq!(ResourceKind::parse("server"), None);
    }
}

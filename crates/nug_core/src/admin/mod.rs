//! Admin-protocol collaborator contracts.
//!
//! # Responsibility
//! - Define the capabilities the core consumes from the remote admin service,
//!   one trait per resource kind.
//! - Define the error vocabulary collaborators report failures with.
//!
//! # Invariants
//! - Collaborators return raw records; decoding happens in the core.
//! - Collaborators are stateless proxies, safe to share for the process
//!   lifetime.
//! - Not-found and conflict outcomes are reported as semantic errors, never
//!   folded into `Remote`.

use crate::model::entity::{AttributeEntity, DecodeError};
use crate::model::record::RawRecord;
use crate::model::resource::ResourceKind;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod memory;
pub mod soap;

pub type AdminResult<T> = Result<T, AdminError>;

/// Failure reported by an admin collaborator.
#[derive(Debug)]
pub enum AdminError {
    NotFound { kind: ResourceKind, id: String },
    Conflict { kind: ResourceKind, name: String },
    Decode(DecodeError),
    Remote(Box<dyn Error + Send + Sync>),
}

impl AdminError {
    /// Wraps a transport or protocol failure, keeping it as `source()`.
    pub fn remote(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Remote(cause.into())
    }
}

impl Display for AdminError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict { kind, name } => write!(f, "{kind} already exists: {name}"),
            Self::Decode(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "admin service failure: {err}"),
        }
    }
}

impl Error for AdminError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Remote(err) => Some(err.as_ref()),
            Self::NotFound { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<DecodeError> for AdminError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

/// Domain administration capability.
pub trait DomainAdmin {
    fn list_domains(&self) -> AdminResult<Vec<RawRecord>>;
    fn get_domain(&self, id: &str) -> AdminResult<RawRecord>;
    fn create_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn update_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn delete_domain(&self, id: &str) -> AdminResult<bool>;
}

/// Class-of-service administration capability.
pub trait CosAdmin {
    fn list_coses(&self) -> AdminResult<Vec<RawRecord>>;
    fn get_cos(&self, id: &str) -> AdminResult<RawRecord>;
    fn create_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn update_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn delete_cos(&self, id: &str) -> AdminResult<bool>;
}

/// Account administration capability.
///
/// Accounts are listed per domain *name*, not domain id.
pub trait AccountAdmin {
    fn list_accounts(&self) -> AdminResult<Vec<RawRecord>>;
    fn list_accounts_by_domain_name(&self, domain_name: &str) -> AdminResult<Vec<RawRecord>>;
    fn get_account(&self, id: &str) -> AdminResult<RawRecord>;
    fn create_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn update_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord>;
    fn delete_account(&self, id: &str) -> AdminResult<bool>;
}

impl<T: DomainAdmin + ?Sized> DomainAdmin for Arc<T> {
    fn list_domains(&self) -> AdminResult<Vec<RawRecord>> {
        (**self).list_domains()
    }

    fn get_domain(&self, id: &str) -> AdminResult<RawRecord> {
        (**self).get_domain(id)
    }

    fn create_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).create_domain(candidate)
    }

    fn update_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).update_domain(candidate)
    }

    fn delete_domain(&self, id: &str) -> AdminResult<bool> {
        (**self).delete_domain(id)
    }
}

impl<T: CosAdmin + ?Sized> CosAdmin for Arc<T> {
    fn list_coses(&self) -> AdminResult<Vec<RawRecord>> {
        (**self).list_coses()
    }

    fn get_cos(&self, id: &str) -> AdminResult<RawRecord> {
        (**self).get_cos(id)
    }

    fn create_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).create_cos(candidate)
    }

    fn update_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).update_cos(candidate)
    }

    fn delete_cos(&self, id: &str) -> AdminResult<bool> {
        (**self).delete_cos(id)
    }
}

impl<T: AccountAdmin + ?Sized> AccountAdmin for Arc<T> {
    fn list_accounts(&self) -> AdminResult<Vec<RawRecord>> {
        (**self).list_accounts()
    }

    fn list_accounts_by_domain_name(&self, domain_name: &str) -> AdminResult<Vec<RawRecord>> {
        (**self).list_accounts_by_domain_name(domain_name)
    }

    fn get_account(&self, id: &str) -> AdminResult<RawRecord> {
        (**self).get_account(id)
    }

    fn create_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).create_account(candidate)
    }

    fn update_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        (**self).update_account(candidate)
    }

    fn delete_account(&self, id: &str) -> AdminResult<bool> {
        (**self).delete_account(id)
    }
}

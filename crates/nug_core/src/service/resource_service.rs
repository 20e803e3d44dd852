//! Resource orchestration over the admin collaborators.
//!
//! # Responsibility
//! - Compose domain/cos/account lookups into boundary-ready mappings.
//! - Validate candidates before any mutating remote call.
//! - Attach derived subresource links to domains.
//!
//! # Invariants
//! - Validation and decode failures happen before any remote mutation.
//! - Remote failures pass through unchanged; nothing is retried.
//! - List results keep the collaborator's order.
//! - Accounts of a domain are looked up by the domain's name, resolved from
//!   its id first.

use crate::admin::{AccountAdmin, AdminError, CosAdmin, DomainAdmin};
use crate::config::ServiceConfig;
use crate::model::entity::{DecodeError, Mapping};
use crate::model::record::RawRecord;
use crate::model::resource::{Account, Cos, Domain, Resource, ResourceKind};
use crate::model::validation::{ValidationError, Validator};
use crate::service::links::{SubresourceLinks, SUBRESOURCES_KEY};
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to the boundary layer, one variant per response class.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed record from the remote service.
    Decode(DecodeError),
    /// Candidate rejected locally; the remote service was not contacted.
    Validation(ValidationError),
    NotFound { kind: ResourceKind, id: String },
    Conflict { kind: ResourceKind, name: String },
    /// Transport or protocol failure; the collaborator error is the source.
    Remote(AdminError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Conflict { kind, name } => write!(f, "{kind} already exists: {name}"),
            Self::Remote(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Remote(err) => Some(err),
            Self::NotFound { .. } | Self::Conflict { .. } => None,
        }
    }
}

impl From<DecodeError> for ServiceError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AdminError> for ServiceError {
    fn from(value: AdminError) -> Self {
        match value {
            AdminError::NotFound { kind, id } => Self::NotFound { kind, id },
            AdminError::Conflict { kind, name } => Self::Conflict { kind, name },
            AdminError::Decode(err) => Self::Decode(err),
            other => Self::Remote(other),
        }
    }
}

/// Façade over the three admin collaborators.
///
/// Collaborators are injected once and reused for every call.
pub struct ResourceService<D, C, A> {
    domains: D,
    coses: C,
    accounts: A,
    links: SubresourceLinks,
}

impl<D: DomainAdmin, C: CosAdmin, A: AccountAdmin> ResourceService<D, C, A> {
    /// Creates a service with the default link root.
    pub fn new(domains: D, coses: C, accounts: A) -> Self {
        Self::with_config(domains, coses, accounts, &ServiceConfig::default())
    }

    pub fn with_config(domains: D, coses: C, accounts: A, config: &ServiceConfig) -> Self {
        Self {
            domains,
            coses,
            accounts,
            links: SubresourceLinks::new(config),
        }
    }

    /// Lists all domains, enriched, in collaborator order.
    pub fn list_domains(&self) -> ServiceResult<Vec<Mapping>> {
        let records = self.domains.list_domains()?;
        debug!("event=domain_list module=service count={}", records.len());
        records
            .iter()
            .map(|record| -> ServiceResult<Mapping> {
                Ok(self.prepare_domain(&Domain::decode(record)?))
            })
            .collect()
    }

    pub fn get_domain(&self, id: &str) -> ServiceResult<Mapping> {
        let domain = Domain::decode(&self.domains.get_domain(id)?)?;
        Ok(self.prepare_domain(&domain))
    }

    /// Validates `candidate`, creates it remotely and returns the canonical
    /// record the remote service answered with.
    pub fn create_domain(
        &self,
        candidate: &Domain,
        validator: &dyn Validator,
    ) -> ServiceResult<Mapping> {
        ensure_valid(candidate, validator)?;
        let domain = Domain::decode(&self.domains.create_domain(candidate.entity())?)?;
        info!(
            "event=domain_create module=service status=ok id={} name={}",
            domain.id(),
            domain.name()
        );
        Ok(self.prepare_domain(&domain))
    }

    pub fn update_domain(
        &self,
        candidate: &Domain,
        validator: &dyn Validator,
    ) -> ServiceResult<Mapping> {
        ensure_valid(candidate, validator)?;
        let domain = Domain::decode(&self.domains.update_domain(candidate.entity())?)?;
        info!(
            "event=domain_update module=service status=ok id={}",
            domain.id()
        );
        Ok(self.prepare_domain(&domain))
    }

    /// Returns the collaborator's success indicator unchanged.
    pub fn delete_domain(&self, id: &str) -> ServiceResult<bool> {
        let deleted = self.domains.delete_domain(id)?;
        info!("event=domain_delete module=service id={id} deleted={deleted}");
        Ok(deleted)
    }

    pub fn list_cos(&self) -> ServiceResult<Vec<Mapping>> {
        let records = self.coses.list_coses()?;
        debug!("event=cos_list module=service count={}", records.len());
        flatten_all::<Cos>(&records)
    }

    pub fn get_cos(&self, id: &str) -> ServiceResult<Mapping> {
        let cos = Cos::decode(&self.coses.get_cos(id)?)?;
        Ok(cos.entity().to_mapping())
    }

    /// Lists accounts of the domain with id `domain_id`.
    ///
    /// The account collaborator addresses domains by name, so the domain is
    /// resolved first.
    pub fn list_accounts_by_domain(&self, domain_id: &str) -> ServiceResult<Vec<Mapping>> {
        let domain = Domain::decode(&self.domains.get_domain(domain_id)?)?;
        let records = self.accounts.list_accounts_by_domain_name(domain.name())?;
        debug!(
            "event=account_list module=service domain_id={domain_id} count={}",
            records.len()
        );
        flatten_all::<Account>(&records)
    }

    pub fn get_account(&self, id: &str) -> ServiceResult<Mapping> {
        let account = Account::decode(&self.accounts.get_account(id)?)?;
        Ok(account.entity().to_mapping())
    }

    pub fn create_account(
        &self,
        candidate: &Account,
        validator: &dyn Validator,
    ) -> ServiceResult<Mapping> {
        ensure_valid(candidate, validator)?;
        let account = Account::decode(&self.accounts.create_account(candidate.entity())?)?;
        info!(
            "event=account_create module=service status=ok id={}",
            account.id()
        );
        Ok(account.entity().to_mapping())
    }

    pub fn update_account(
        &self,
        candidate: &Account,
        validator: &dyn Validator,
    ) -> ServiceResult<Mapping> {
        ensure_valid(candidate, validator)?;
        let account = Account::decode(&self.accounts.update_account(candidate.entity())?)?;
        info!(
            "event=account_update module=service status=ok id={}",
            account.id()
        );
        Ok(account.entity().to_mapping())
    }

    /// Returns the collaborator's success indicator unchanged.
    pub fn delete_account(&self, id: &str) -> ServiceResult<bool> {
        let deleted = self.accounts.delete_account(id)?;
        info!("event=account_delete module=service id={id} deleted={deleted}");
        Ok(deleted)
    }

    fn prepare_domain(&self, domain: &Domain) -> Mapping {
        prepare_domain(domain, &self.links)
    }
}

/// Flattens a domain and attaches its subresource links.
pub fn prepare_domain(domain: &Domain, links: &SubresourceLinks) -> Mapping {
    let mut mapping = domain.entity().to_mapping();
    mapping.insert(
        SUBRESOURCES_KEY.to_string(),
        Value::Object(links.for_domain(domain)),
    );
    mapping
}

fn flatten_all<R: Resource>(records: &[RawRecord]) -> ServiceResult<Vec<Mapping>> {
    records
        .iter()
        .map(|record| -> ServiceResult<Mapping> {
            Ok(R::decode(record)?.entity().to_mapping())
        })
        .collect()
}

fn ensure_valid<R: Resource>(candidate: &R, validator: &dyn Validator) -> ServiceResult<()> {
    candidate.validate(validator).map_err(|err| {
        warn!(
            "event={}_validate module=service status=rejected violations={}",
            R::KIND,
            err.violations.len()
        );
        ServiceError::from(err)
    })
}

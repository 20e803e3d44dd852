//! In-process admin collaborator.
//!
//! # Responsibility
//! - Implement all three admin capabilities against in-memory stores, for
//!   local tooling and tests that need a working remote stand-in.
//!
//! # Invariants
//! - Ids are fresh UUID v4 strings assigned on create.
//! - Names are unique per kind; creating or renaming onto a taken name is a
//!   `Conflict`.
//! - Listing preserves creation order.

use crate::admin::{AccountAdmin, AdminError, AdminResult, CosAdmin, DomainAdmin};
use crate::model::entity::AttributeEntity;
use crate::model::record::RawRecord;
use crate::model::resource::ResourceKind;
use log::debug;
use std::sync::Mutex;
use uuid::Uuid;

/// Mutex-guarded in-memory admin service.
#[derive(Debug, Default)]
pub struct InMemoryAdmin {
    stores: Mutex<Stores>,
}

#[derive(Debug)]
struct Stores {
    domains: Store,
    coses: Store,
    accounts: Store,
}

impl Default for Stores {
    fn default() -> Self {
        Self {
            domains: Store::new(ResourceKind::Domain),
            coses: Store::new(ResourceKind::Cos),
            accounts: Store::new(ResourceKind::Account),
        }
    }
}

#[derive(Debug)]
struct Store {
    kind: ResourceKind,
    records: Vec<RawRecord>,
}

impl Store {
    fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records
            .iter()
            .position(|record| record.id.as_deref() == Some(id))
    }

    fn name_taken_by_other(&self, name: &str, id: Option<&str>) -> bool {
        self.records.iter().any(|record| {
            record.name.as_deref() == Some(name) && (id.is_none() || record.id.as_deref() != id)
        })
    }

    fn not_found(&self, id: &str) -> AdminError {
        AdminError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        }
    }

    fn get(&self, id: &str) -> AdminResult<RawRecord> {
        self.position(id)
            .map(|index| self.records[index].clone())
            .ok_or_else(|| self.not_found(id))
    }

    fn insert(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    fn create(&mut self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        if self.name_taken_by_other(candidate.name(), None) {
            return Err(AdminError::Conflict {
                kind: self.kind,
                name: candidate.name().to_string(),
            });
        }

        let record = RawRecord {
            id: Some(Uuid::new_v4().to_string()),
            name: Some(candidate.name().to_string()),
            attributes: candidate.to_raw_pairs(),
        };
        debug!(
            "event=memory_create module=admin kind={} id={}",
            self.kind,
            record.id.as_deref().unwrap_or_default()
        );
        self.records.push(record.clone());
        Ok(record)
    }

    fn update(&mut self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        let index = self
            .position(candidate.id())
            .ok_or_else(|| self.not_found(candidate.id()))?;
        if self.name_taken_by_other(candidate.name(), Some(candidate.id())) {
            return Err(AdminError::Conflict {
                kind: self.kind,
                name: candidate.name().to_string(),
            });
        }

        let record = &mut self.records[index];
        record.name = Some(candidate.name().to_string());
        record.attributes = candidate.to_raw_pairs();
        Ok(record.clone())
    }

    fn delete(&mut self, id: &str) -> AdminResult<bool> {
        let index = self.position(id).ok_or_else(|| self.not_found(id))?;
        self.records.remove(index);
        Ok(true)
    }
}

impl InMemoryAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an already-decoded wire record as if the remote held it.
    pub fn seed(&self, kind: ResourceKind, record: RawRecord) -> AdminResult<()> {
        self.with_store(kind, |store| {
            store.insert(record);
            Ok(())
        })
    }

    fn with_store<T>(
        &self,
        kind: ResourceKind,
        op: impl FnOnce(&mut Store) -> AdminResult<T>,
    ) -> AdminResult<T> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| AdminError::remote("in-memory admin state poisoned"))?;
        let store = match kind {
            ResourceKind::Domain => &mut stores.domains,
            ResourceKind::Cos => &mut stores.coses,
            ResourceKind::Account => &mut stores.accounts,
        };
        op(store)
    }
}

impl DomainAdmin for InMemoryAdmin {
    fn list_domains(&self) -> AdminResult<Vec<RawRecord>> {
        self.with_store(ResourceKind::Domain, |store| Ok(store.records.clone()))
    }

    fn get_domain(&self, id: &str) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Domain, |store| store.get(id))
    }

    fn create_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Domain, |store| store.create(candidate))
    }

    fn update_domain(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Domain, |store| store.update(candidate))
    }

    fn delete_domain(&self, id: &str) -> AdminResult<bool> {
        self.with_store(ResourceKind::Domain, |store| store.delete(id))
    }
}

impl CosAdmin for InMemoryAdmin {
    fn list_coses(&self) -> AdminResult<Vec<RawRecord>> {
        self.with_store(ResourceKind::Cos, |store| Ok(store.records.clone()))
    }

    fn get_cos(&self, id: &str) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Cos, |store| store.get(id))
    }

    fn create_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Cos, |store| store.create(candidate))
    }

    fn update_cos(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Cos, |store| store.update(candidate))
    }

    fn delete_cos(&self, id: &str) -> AdminResult<bool> {
        self.with_store(ResourceKind::Cos, |store| store.delete(id))
    }
}

impl AccountAdmin for InMemoryAdmin {
    fn list_accounts(&self) -> AdminResult<Vec<RawRecord>> {
        self.with_store(ResourceKind::Account, |store| Ok(store.records.clone()))
    }

    fn list_accounts_by_domain_name(&self, domain_name: &str) -> AdminResult<Vec<RawRecord>> {
        let suffix = format!("@{}", domain_name.to_ascii_lowercase());
        self.with_store(ResourceKind::Account, |store| {
            Ok(store
                .records
                .iter()
                .filter(|record| {
                    record
                        .name
                        .as_deref()
                        .is_some_and(|name| name.to_ascii_lowercase().ends_with(&suffix))
                })
                .cloned()
                .collect())
        })
    }

    fn get_account(&self, id: &str) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Account, |store| store.get(id))
    }

    fn create_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Account, |store| store.create(candidate))
    }

    fn update_account(&self, candidate: &AttributeEntity) -> AdminResult<RawRecord> {
        self.with_store(ResourceKind::Account, |store| store.update(candidate))
    }

    fn delete_account(&self, id: &str) -> AdminResult<bool> {
        self.with_store(ResourceKind::Account, |store| store.delete(id))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryAdmin;
    use crate::admin::{AccountAdmin, AdminError, DomainAdmin};
    use crate::model::entity::AttributeEntity;
    use crate::model::record::RawRecord;
    use crate::model::resource::ResourceKind;

    #[test]
    fn create_assigns_id_and_rejects_duplicate_names() {
        let admin = InMemoryAdmin::new();
        let candidate = AttributeEntity::new("", "example.com");

        let created = admin.create_domain(&candidate).unwrap();
        assert!(!created.id.as_deref().unwrap_or("").is_empty());
        assert_eq!(created.name.as_deref(), Some("example.com"));

        let err = admin.create_domain(&candidate).unwrap_err();
        assert!(matches!(err, AdminError::Conflict { kind: ResourceKind::Domain, .. }));
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let admin = InMemoryAdmin::new();
        let err = admin.delete_account("missing").unwrap_err();
        assert!(matches!(err, AdminError::NotFound { ref id, .. } if id == "missing"));
    }

    #[test]
    fn accounts_filter_by_domain_suffix() {
        let admin = InMemoryAdmin::new();
        admin
            .seed(ResourceKind::Account, RawRecord::new("a1", "alice@example.com"))
            .unwrap();
        admin
            .seed(ResourceKind::Account, RawRecord::new("a2", "bob@other.org"))
            .unwrap();

        let listed = admin.list_accounts_by_domain_name("EXAMPLE.com").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_deref(), Some("a1"));
    }
}

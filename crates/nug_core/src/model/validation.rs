//! Field-level validation for candidate resources.
//!
//! # Responsibility
//! - Define the validator contract used before every mutating admin call.
//! - Provide the default presence/format rule set.
//!
//! # Invariants
//! - Validators are pure: same entity in, same violations out.
//! - A failed validation reports every violated field, never just the first.

use crate::model::entity::{AttributeEntity, AttributeValue, NAME_KEY};
use crate::model::resource::{ResourceKind, DOMAIN_DEFAULT_COS_KEY};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static HOSTNAME_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$").expect("valid hostname label regex")
});
static MAILBOX_LOCAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+\-]+$").expect("valid mailbox local-part regex"));

const PASSWORD_KEY: &str = "password";
const MIN_PASSWORD_CHARS: usize = 6;

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validation failure carrying every violation found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub kind: ResourceKind,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(kind: ResourceKind, violations: Vec<Violation>) -> Self {
        Self { kind, violations }
    }

    /// Names of the violated fields, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations
            .iter()
            .map(|violation| violation.field.as_str())
            .collect()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: ", self.kind)?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

/// Checks field constraints for one resource kind.
pub trait Validator {
    fn check(&self, kind: ResourceKind, entity: &AttributeEntity) -> Vec<Violation>;
}

impl<F> Validator for F
where
    F: Fn(ResourceKind, &AttributeEntity) -> Vec<Violation>,
{
    fn check(&self, kind: ResourceKind, entity: &AttributeEntity) -> Vec<Violation> {
        self(kind, entity)
    }
}

/// Default presence and format rules.
///
/// - every kind: non-empty `name`
/// - domain: `name` is a dotted hostname; default cos id non-empty if present
/// - account: `name` is `local@domain`; `password`, if present, a single text
///   of at least 6 chars
/// - plus any field registered through [`RuleValidator::require`]
#[derive(Debug, Clone, Default)]
pub struct RuleValidator {
    required: BTreeMap<ResourceKind, Vec<String>>,
}

impl RuleValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extra field that must be present and non-blank.
    pub fn require(mut self, kind: ResourceKind, field: impl Into<String>) -> Self {
        self.required.entry(kind).or_default().push(field.into());
        self
    }
}

impl Validator for RuleValidator {
    fn check(&self, kind: ResourceKind, entity: &AttributeEntity) -> Vec<Violation> {
        let mut violations = Vec::new();
        let name = entity.name().trim();

        if name.is_empty() {
            violations.push(Violation::new(NAME_KEY, "must not be empty"));
        } else {
            match kind {
                ResourceKind::Domain if !is_hostname(name) => {
                    violations.push(Violation::new(NAME_KEY, "must be a valid domain name"));
                }
                ResourceKind::Account if !is_mailbox_address(name) => {
                    violations.push(Violation::new(
                        NAME_KEY,
                        "must be an address of the form local@domain",
                    ));
                }
                _ => {}
            }
        }

        match kind {
            ResourceKind::Domain => {
                if entity
                    .get(DOMAIN_DEFAULT_COS_KEY)
                    .is_some_and(|value| value.is_blank())
                {
                    violations.push(Violation::new(
                        DOMAIN_DEFAULT_COS_KEY,
                        "must not be empty when present",
                    ));
                }
            }
            ResourceKind::Account => match entity.get(PASSWORD_KEY) {
                Some(AttributeValue::Text(password))
                    if password.chars().count() < MIN_PASSWORD_CHARS =>
                {
                    violations.push(Violation::new(
                        PASSWORD_KEY,
                        format!("must be at least {MIN_PASSWORD_CHARS} characters"),
                    ));
                }
                Some(AttributeValue::Flag(_) | AttributeValue::List(_)) => {
                    violations.push(Violation::new(PASSWORD_KEY, "must be a single text value"));
                }
                _ => {}
            },
            ResourceKind::Cos => {}
        }

        for field in self.required.get(&kind).into_iter().flatten() {
            let present = entity.get(field).is_some_and(|value| !value.is_blank());
            if !present {
                violations.push(Violation::new(field.as_str(), "is required"));
            }
        }

        violations
    }
}

fn is_hostname(value: &str) -> bool {
    let labels: Vec<&str> = value.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| HOSTNAME_LABEL_RE.is_match(label))
}

fn is_mailbox_address(value: &str) -> bool {
    match value.rsplit_once('@') {
        Some((local, domain)) => MAILBOX_LOCAL_RE.is_match(local) && is_hostname(domain),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_hostname, is_mailbox_address};

    #[test]
    fn hostname_requires_two_labels_without_edge_hyphens() {
        assert!(is_hostname("example.com"));
        assert!(is_hostname("mail.Example-1.org"));
        assert!(!is_hostname("localhost"));
        assert!(!is_hostname("-bad.example.com"));
        assert!(!is_hostname("example..com"));
    }

    #[test]
    fn mailbox_address_checks_both_parts() {
        assert!(is_mailbox_address("first.last+tag@example.com"));
        assert!(!is_mailbox_address("@example.com"));
        assert!(!is_mailbox_address("alice@localhost"));
        assert!(!is_mailbox_address("alice"));
    }
}

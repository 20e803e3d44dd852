//! Wire-level record shape returned by the admin protocol.
//!
//! # Responsibility
//! - Carry an id, a name and a repeatable list of `(key, text)` pairs exactly
//!   as received, before any typing or coalescing.
//!
//! # Invariants
//! - Pair order is source order; repeated keys are kept as separate pairs.
//! - `id`/`name` are optional here; their absence is reported by
//!   `AttributeEntity::decode`, never papered over.

/// Raw admin-protocol record prior to decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub attributes: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates a record with both identity fields present.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            attributes: Vec::new(),
        }
    }

    /// Appends one `(key, text)` pair.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_attr(key, value);
        self
    }

    pub fn push_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }
}

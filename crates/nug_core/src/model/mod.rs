//! Decoded resource model for admin-protocol records.
//!
//! # Responsibility
//! - Turn semi-structured attribute-list records into typed entities.
//! - Define the resource kinds and the validation contract for candidates.
//!
//! # Invariants
//! - Decoding is the only place that resolves scalar/multi-value/flag
//!   ambiguity of the wire format.
//! - Entities never write back to the remote service on their own.

pub mod entity;
pub mod record;
pub mod resource;
pub mod validation;

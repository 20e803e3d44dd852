//! Resource orchestration services.
//!
//! # Responsibility
//! - Orchestrate admin collaborator calls into boundary-level operations.
//! - Keep the REST layer decoupled from entity types and wire records.

pub mod links;
pub mod resource_service;

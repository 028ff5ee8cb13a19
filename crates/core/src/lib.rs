//! `factory-core`: shared building blocks for the factory catalog.
//!
//! Pure domain primitives only: identifiers, the entity contract and the
//! domain error model. No HTTP, no storage.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, Timestamps};
pub use error::{DomainError, DomainResult};
pub use id::RecordId;

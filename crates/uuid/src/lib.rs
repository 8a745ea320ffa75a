//! Record identifiers and sharded-path utilities.
//!
//! Medication records are addressed by a *canonical* identifier: **32 lowercase hexadecimal
//! characters** (no hyphens), the same value `Uuid::new_v4().simple().to_string()` produces.
//!
//! This crate provides:
//! - [`MedicationId`], a wrapper that guarantees the canonical format once constructed.
//! - Sharding logic to derive the on-disk directory of a record from its identifier.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, the file store keeps a record under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `medication_data/medications/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! Two shard levels keep any single directory from growing without bound.

mod id;

pub use id::{MedicationId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;

//! # Medication Core
//!
//! Core business logic for the medication records service:
//! - ICD-10 annotation of free text ([`icd10`])
//! - The medication record and its validation ([`medication`], [`validation`])
//! - Persistence behind the [`MedicationRepository`] trait ([`repositories`])
//! - The [`MedicationService`] orchestrating both
//!
//! **No API concerns**: HTTP servers, authentication and response shaping belong in `api-rest`
//! and `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod icd10;
pub mod medication;
pub mod repositories;
pub mod service;
pub mod validation;

pub use config::{CoreConfig, Environment, StorageBackend};
pub use constants::DEFAULT_MEDICATION_DATA_DIR;
pub use error::{ErrorKind, MedicationError, MedicationResult};
pub use icd10::{map_text_to_icd10, Candidate};
pub use medication::{Indication, Medication, MedicationPatch, NewMedication};
pub use medication_uuid::MedicationId;
pub use repositories::{build_repository, DynMedicationRepository, MedicationRepository};
pub use service::MedicationService;

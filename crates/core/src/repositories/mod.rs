//! Medication persistence.
//!
//! [`MedicationRepository`] is the contract every backend implements. Two backends ship with the
//! crate:
//!
//! - [`memory::InMemoryMedicationRepository`]: process-local, lost on restart
//! - [`file::FileMedicationRepository`]: one JSON file per record in a sharded directory tree
//!
//! [`build_repository`] picks one from [`CoreConfig`].

pub mod file;
pub mod memory;

use crate::config::{CoreConfig, StorageBackend};
use crate::medication::{Medication, NewMedication};
use crate::MedicationResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Storage contract for medication records.
///
/// Absence is never an error: lookups return `None`, deletes return `false`. Errors are reserved
/// for infrastructure failures. Identifiers are taken as raw strings; an identifier the backend
/// could never have issued is simply absent.
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    /// Persist a new record, assigning its id and timestamps.
    async fn create(&self, medication: NewMedication) -> MedicationResult<Medication>;

    async fn find_by_id(&self, id: &str) -> MedicationResult<Option<Medication>>;

    async fn find_all(&self) -> MedicationResult<Vec<Medication>>;

    /// Replace the stored record that has `medication.id`.
    ///
    /// Returns `None` if no such record exists.
    async fn update(&self, medication: Medication) -> MedicationResult<Option<Medication>>;

    /// Returns `true` if a record was removed.
    async fn delete(&self, id: &str) -> MedicationResult<bool>;

    /// Records whose name, description or any indication description contains `query`,
    /// ignoring case. An empty query matches everything.
    async fn search(&self, query: &str) -> MedicationResult<Vec<Medication>>;
}

/// Shared, type-erased repository handle.
pub type DynMedicationRepository = Arc<dyn MedicationRepository>;

/// Build the repository selected by `cfg`.
///
/// # Errors
///
/// Returns `MedicationError::StorageDirCreation` if the file backend's directory cannot be
/// created.
pub fn build_repository(cfg: &CoreConfig) -> MedicationResult<DynMedicationRepository> {
    match cfg.storage() {
        StorageBackend::Memory => {
            tracing::info!("using in-memory medication repository");
            Ok(Arc::new(memory::InMemoryMedicationRepository::new()))
        }
        StorageBackend::File => {
            let dir = cfg.medications_dir();
            tracing::info!("using file medication repository at {}", dir.display());
            Ok(Arc::new(file::FileMedicationRepository::open(dir)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use tempfile::TempDir;

    fn new_med(name: &str) -> NewMedication {
        NewMedication {
            name: name.into(),
            dosage: "10mg".into(),
            frequency: "Once daily".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_build_memory_repository() {
        let cfg = CoreConfig::default();
        let repo = build_repository(&cfg).expect("memory repository should build");

        let created = repo.create(new_med("Amlodipine")).await.unwrap();
        assert!(repo.find_by_id(&created.id.to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_build_file_repository_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(
            "127.0.0.1:0".into(),
            Environment::Test,
            StorageBackend::File,
            temp_dir.path().to_path_buf(),
            None,
        )
        .unwrap();

        let repo = build_repository(&cfg).expect("file repository should build");
        assert!(cfg.medications_dir().is_dir());

        repo.create(new_med("Amlodipine")).await.unwrap();
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }
}

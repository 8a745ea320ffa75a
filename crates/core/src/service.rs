//! Medication service.
//!
//! Thin orchestration over a [`MedicationRepository`]. The service holds no state of its own:
//! repository failures are returned unchanged and "not found" is a value (`None` / `false`),
//! never an error. Input is expected to be validated by the caller.

use crate::icd10::{map_text_to_icd10, Candidate};
use crate::medication::{Medication, MedicationPatch, NewMedication};
use crate::repositories::DynMedicationRepository;
use crate::MedicationResult;
use chrono::Utc;

/// Medication operations exposed to the HTTP layer and the CLI.
#[derive(Clone)]
pub struct MedicationService {
    repository: DynMedicationRepository,
}

impl MedicationService {
    /// Creates a service over the given repository.
    pub fn new(repository: DynMedicationRepository) -> Self {
        Self { repository }
    }

    /// Persists a new record and returns it with its generated id and timestamps.
    pub async fn create(&self, data: NewMedication) -> MedicationResult<Medication> {
        let created = self.repository.create(data).await?;
        tracing::info!(id = %created.id, name = %created.name, "medication created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: &str) -> MedicationResult<Option<Medication>> {
        self.repository.find_by_id(id).await
    }

    pub async fn get_all(&self) -> MedicationResult<Vec<Medication>> {
        self.repository.find_all().await
    }

    /// Merges `patch` onto an existing record.
    ///
    /// Returns `None` without writing anything if the record does not exist.
    pub async fn update(
        &self,
        id: &str,
        patch: MedicationPatch,
    ) -> MedicationResult<Option<Medication>> {
        let Some(mut existing) = self.repository.find_by_id(id).await? else {
            tracing::debug!(id, "update skipped; medication not found");
            return Ok(None);
        };

        existing.apply_patch(patch, Utc::now());
        let updated = self.repository.update(existing).await?;
        if let Some(record) = &updated {
            tracing::info!(id = %record.id, "medication updated");
        }
        Ok(updated)
    }

    /// Deletes a record. Returns `false` without side effects if it does not exist.
    pub async fn delete(&self, id: &str) -> MedicationResult<bool> {
        if self.repository.find_by_id(id).await?.is_none() {
            tracing::debug!(id, "delete skipped; medication not found");
            return Ok(false);
        }

        let deleted = self.repository.delete(id).await?;
        if deleted {
            tracing::info!(id, "medication deleted");
        }
        Ok(deleted)
    }

    pub async fn search(&self, query: &str) -> MedicationResult<Vec<Medication>> {
        self.repository.search(query).await
    }

    /// Maps free text to ICD-10 candidates. Never fails and never touches the repository.
    pub fn extract_and_map_indications(&self, text: &str) -> Vec<Candidate> {
        map_text_to_icd10(text)
    }
}

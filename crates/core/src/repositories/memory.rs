//! Process-local repository.

use super::MedicationRepository;
use crate::medication::{Medication, NewMedication};
use crate::MedicationResult;
use async_trait::async_trait;
use chrono::Utc;
use medication_uuid::MedicationId;
use tokio::sync::RwLock;

/// In-memory medication storage.
///
/// Records are kept in insertion order, which is also the order `find_all` and `search` return.
#[derive(Debug, Default)]
pub struct InMemoryMedicationRepository {
    records: RwLock<Vec<Medication>>,
}

impl InMemoryMedicationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MedicationRepository for InMemoryMedicationRepository {
    async fn create(&self, medication: NewMedication) -> MedicationResult<Medication> {
        let record = Medication::from_new(MedicationId::new(), medication, Utc::now());
        self.records.write().await.push(record.clone());
        tracing::debug!(id = %record.id, "stored medication in memory");
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> MedicationResult<Option<Medication>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|m| m.id.to_string() == id).cloned())
    }

    async fn find_all(&self) -> MedicationResult<Vec<Medication>> {
        Ok(self.records.read().await.clone())
    }

    async fn update(&self, medication: Medication) -> MedicationResult<Option<Medication>> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|m| m.id == medication.id) {
            Some(slot) => {
                *slot = medication.clone();
                Ok(Some(medication))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> MedicationResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|m| m.id.to_string() != id);
        Ok(records.len() != before)
    }

    async fn search(&self, query: &str) -> MedicationResult<Vec<Medication>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|m| m.matches_query(query))
            .cloned()
            .collect())
    }
}

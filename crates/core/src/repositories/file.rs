//! Sharded JSON file repository.
//!
//! ## Storage Layout
//!
//! ```text
//! medications/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         medication.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record id.
//!
//! Filesystem calls are blocking, so every operation runs on tokio's blocking pool. Writes go
//! to a temporary file that is then renamed over the record, so readers never observe a
//! half-written file.

use super::MedicationRepository;
use crate::constants::MEDICATION_JSON_FILENAME;
use crate::medication::{Medication, NewMedication};
use crate::{MedicationError, MedicationResult};
use async_trait::async_trait;
use chrono::Utc;
use medication_uuid::MedicationId;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const TEMP_SUFFIX: &str = "tmp";

/// File-backed medication storage rooted at a single directory.
#[derive(Debug)]
pub struct FileMedicationRepository {
    root: PathBuf,
    // serialises read-modify-write sequences (update, delete)
    write_lock: Mutex<()>,
}

impl FileMedicationRepository {
    /// Open (and create if needed) a repository rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `MedicationError::StorageDirCreation` if `root` cannot be created.
    pub fn open(root: PathBuf) -> MedicationResult<Self> {
        fs::create_dir_all(&root).map_err(MedicationError::StorageDirCreation)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn run_blocking<T, F>(&self, op: F) -> MedicationResult<T>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> MedicationResult<T> + Send + 'static,
    {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || op(root))
            .await
            .map_err(|e| MedicationError::StorageTask(e.to_string()))?
    }
}

#[async_trait]
impl MedicationRepository for FileMedicationRepository {
    async fn create(&self, medication: NewMedication) -> MedicationResult<Medication> {
        let record = Medication::from_new(MedicationId::new(), medication, Utc::now());
        let to_write = record.clone();
        self.run_blocking(move |root| write_record(&root, &to_write))
            .await?;
        tracing::debug!(id = %record.id, "stored medication on disk");
        Ok(record)
    }

    async fn find_by_id(&self, id: &str) -> MedicationResult<Option<Medication>> {
        let Ok(id) = MedicationId::parse(id) else {
            return Ok(None);
        };
        self.run_blocking(move |root| read_record(&record_path(&root, &id)))
            .await
    }

    async fn find_all(&self) -> MedicationResult<Vec<Medication>> {
        self.run_blocking(|root| Ok(list_records(&root))).await
    }

    async fn update(&self, medication: Medication) -> MedicationResult<Option<Medication>> {
        let _guard = self.write_lock.lock().await;
        self.run_blocking(move |root| {
            if !record_path(&root, &medication.id).is_file() {
                return Ok(None);
            }
            write_record(&root, &medication)?;
            Ok(Some(medication))
        })
        .await
    }

    async fn delete(&self, id: &str) -> MedicationResult<bool> {
        let Ok(id) = MedicationId::parse(id) else {
            return Ok(false);
        };
        let _guard = self.write_lock.lock().await;
        self.run_blocking(move |root| remove_record(&root, &id))
            .await
    }

    async fn search(&self, query: &str) -> MedicationResult<Vec<Medication>> {
        let query = query.to_string();
        self.run_blocking(move |root| {
            Ok(list_records(&root)
                .into_iter()
                .filter(|m| m.matches_query(&query))
                .collect())
        })
        .await
    }
}

fn record_path(root: &Path, id: &MedicationId) -> PathBuf {
    id.sharded_dir(root).join(MEDICATION_JSON_FILENAME)
}

fn read_record(path: &Path) -> MedicationResult<Option<Medication>> {
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).map_err(MedicationError::FileRead)?;
    let record = serde_json::from_str(&contents).map_err(MedicationError::Deserialization)?;
    Ok(Some(record))
}

fn write_record(root: &Path, medication: &Medication) -> MedicationResult<()> {
    let record_dir = medication.id.sharded_dir(root);
    fs::create_dir_all(&record_dir).map_err(MedicationError::StorageDirCreation)?;

    let json =
        serde_json::to_string_pretty(medication).map_err(MedicationError::Serialization)?;

    let final_path = record_dir.join(MEDICATION_JSON_FILENAME);
    let temp_path = final_path.with_extension(TEMP_SUFFIX);
    fs::write(&temp_path, json).map_err(MedicationError::FileWrite)?;
    fs::rename(&temp_path, &final_path).map_err(MedicationError::FileWrite)?;
    Ok(())
}

fn remove_record(root: &Path, id: &MedicationId) -> MedicationResult<bool> {
    let record_dir = id.sharded_dir(root);
    if !record_dir.join(MEDICATION_JSON_FILENAME).is_file() {
        return Ok(false);
    }
    fs::remove_dir_all(&record_dir).map_err(MedicationError::FileRemove)?;

    // Drop shard directories left empty; failure here only leaves an empty folder behind.
    if let Some(s2) = record_dir.parent() {
        if fs::remove_dir(s2).is_ok() {
            if let Some(s1) = s2.parent() {
                let _ = fs::remove_dir(s1);
            }
        }
    }
    Ok(true)
}

/// Walk `<root>/<s1>/<s2>/<id>/medication.json`, skipping anything unreadable.
///
/// Records are returned ordered by creation time, then id.
fn list_records(root: &Path) -> Vec<Medication> {
    let mut records = Vec::new();

    let s1_iter = match fs::read_dir(root) {
        Ok(it) => it,
        Err(_) => return records,
    };
    for s1 in s1_iter.flatten() {
        let s1_path = s1.path();
        if !s1_path.is_dir() {
            continue;
        }

        let s2_iter = match fs::read_dir(&s1_path) {
            Ok(it) => it,
            Err(_) => continue,
        };

        for s2 in s2_iter.flatten() {
            let s2_path = s2.path();
            if !s2_path.is_dir() {
                continue;
            }

            let id_iter = match fs::read_dir(&s2_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for id_ent in id_iter.flatten() {
                let record_path = id_ent.path().join(MEDICATION_JSON_FILENAME);
                match read_record(&record_path) {
                    Ok(Some(record)) => records.push(record),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(
                            "failed to read medication record: {} - {}",
                            record_path.display(),
                            e
                        );
                    }
                }
            }
        }
    }

    records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medication::Indication;
    use tempfile::TempDir;

    fn new_med(name: &str) -> NewMedication {
        NewMedication {
            name: name.into(),
            dosage: "100mg".into(),
            frequency: "Once daily".into(),
            ..Default::default()
        }
    }

    fn open_repo(temp_dir: &TempDir) -> FileMedicationRepository {
        FileMedicationRepository::open(temp_dir.path().join("medications"))
            .expect("repository should open")
    }

    #[tokio::test]
    async fn test_create_writes_sharded_json_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        let created = repo.create(new_med("Test Medication")).await.unwrap();
        let path = record_path(repo.root(), &created.id);

        assert!(path.is_file(), "medication.json should exist");
        let canonical = created.id.to_string();
        assert!(path.ends_with(format!(
            "{}/{}/{}/medication.json",
            &canonical[0..2],
            &canonical[2..4],
            canonical
        )));
        assert!(!path.with_extension(TEMP_SUFFIX).exists());

        let on_disk: Medication =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, created);
    }

    #[tokio::test]
    async fn test_find_by_id_round_trip_and_absence() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        let created = repo.create(new_med("Test Get Medication")).await.unwrap();
        let found = repo.find_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(found, Some(created));

        assert!(repo.find_by_id("missing-id").await.unwrap().is_none());
        assert!(repo
            .find_by_id(&MedicationId::new().to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let created = open_repo(&temp_dir)
            .create(new_med("Persistent"))
            .await
            .unwrap();

        let reopened = open_repo(&temp_dir);
        let all = reopened.find_all().await.unwrap();
        assert_eq!(all, vec![created]);
    }

    #[tokio::test]
    async fn test_update_only_touches_existing_records() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        let mut created = repo.create(new_med("Test Update Medication")).await.unwrap();
        created.frequency = "Twice daily".into();
        let updated = repo.update(created.clone()).await.unwrap();
        assert_eq!(updated, Some(created.clone()));

        let reread = repo.find_by_id(&created.id.to_string()).await.unwrap();
        assert_eq!(reread.map(|m| m.frequency), Some("Twice daily".to_string()));

        let orphan = Medication::from_new(MedicationId::new(), new_med("Orphan"), Utc::now());
        let orphan_id = orphan.id;
        assert!(repo.update(orphan).await.unwrap().is_none());
        assert!(!orphan_id.sharded_dir(repo.root()).exists());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_empty_shards() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        let created = repo.create(new_med("Test Delete")).await.unwrap();
        let id = created.id.to_string();

        assert!(repo.delete(&id).await.unwrap());
        assert!(!created.id.sharded_dir(repo.root()).exists());
        assert!(!repo.root().join(&id[0..2]).exists());
        assert!(!repo.delete(&id).await.unwrap());
        assert!(!repo.delete("missing-id").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_skips_corrupt_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        repo.create(new_med("Valid")).await.unwrap();

        let broken = MedicationId::new().sharded_dir(repo.root());
        fs::create_dir_all(&broken).unwrap();
        fs::write(broken.join(MEDICATION_JSON_FILENAME), "{ not json").unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Valid");
    }

    #[tokio::test]
    async fn test_find_all_empty_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = open_repo(&temp_dir);

        repo.create(new_med("Medication 1")).await.unwrap();
        repo.create(new_med("Medication 2")).await.unwrap();
        repo.create(NewMedication {
            indications: Some(vec![Indication {
                description: "lung infection".into(),
                code: Some("J18.9".into()),
                code_description: Some("Pneumonia, unspecified".into()),
                confidence: Some(0.95),
            }]),
            ..new_med("Amoxicillin")
        })
        .await
        .unwrap();

        assert_eq!(repo.search("medication").await.unwrap().len(), 2);
        assert_eq!(repo.search("LUNG").await.unwrap().len(), 1);
        assert_eq!(repo.search("").await.unwrap().len(), 3);
    }
}

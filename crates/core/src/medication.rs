//! Medication records and their embedded indications.
//!
//! Three shapes of the same record travel through the system:
//!
//! - [`NewMedication`]: what a caller submits for creation (no id, no timestamps)
//! - [`MedicationPatch`]: a partial update where every field is optional
//! - [`Medication`]: the persisted record owned by a repository
//!
//! JSON uses camelCase field names and omits absent optional fields.

use crate::icd10::Candidate;
use chrono::{DateTime, Utc};
use medication_uuid::MedicationId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored diagnosis annotation, usually produced by the ICD-10 mapper.
///
/// Older clients send `icd10Code` / `icd10Description`; both are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Indication {
    pub description: String,
    #[serde(default, alias = "icd10Code", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(
        default,
        alias = "icd10Description",
        skip_serializing_if = "Option::is_none"
    )]
    pub code_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl From<Candidate> for Indication {
    fn from(candidate: Candidate) -> Self {
        Self {
            description: candidate.description,
            code: Some(candidate.code),
            code_description: Some(candidate.code_description),
            confidence: Some(candidate.confidence),
        }
    }
}

/// Input for creating a medication record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMedication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indications: Option<Vec<Indication>>,
}

impl NewMedication {
    /// Strip surrounding whitespace from every free-text field.
    pub fn normalise(&mut self) {
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.dosage);
        trim_in_place(&mut self.frequency);
        trim_optional(&mut self.description);
        trim_list(&mut self.active_ingredients);
        trim_list(&mut self.side_effects);
    }
}

/// Partial update. Present fields replace the stored value; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indications: Option<Vec<Indication>>,
}

impl MedicationPatch {
    pub fn normalise(&mut self) {
        trim_optional(&mut self.name);
        trim_optional(&mut self.dosage);
        trim_optional(&mut self.frequency);
        trim_optional(&mut self.description);
        trim_list(&mut self.active_ingredients);
        trim_list(&mut self.side_effects);
    }
}

/// A persisted medication record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    #[schema(value_type = String, example = "550e8400e29b41d4a716446655440000")]
    pub id: MedicationId,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_ingredients: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indications: Option<Vec<Indication>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    /// Build a stored record from creation input. Both timestamps are set to `now`.
    pub fn from_new(id: MedicationId, new: NewMedication, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            dosage: new.dosage,
            frequency: new.frequency,
            description: new.description,
            active_ingredients: new.active_ingredients,
            side_effects: new.side_effects,
            indications: new.indications,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `patch` onto this record and refresh `updated_at`.
    ///
    /// `id` and `created_at` are never touched.
    pub fn apply_patch(&mut self, patch: MedicationPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(dosage) = patch.dosage {
            self.dosage = dosage;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.active_ingredients.is_some() {
            self.active_ingredients = patch.active_ingredients;
        }
        if patch.side_effects.is_some() {
            self.side_effects = patch.side_effects;
        }
        if patch.indications.is_some() {
            self.indications = patch.indications;
        }
        self.updated_at = now;
    }

    /// Case-insensitive literal match on name, description or any indication description.
    ///
    /// An empty query matches every record.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return true;
        }

        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&self.name)
            || self.description.as_deref().is_some_and(contains)
            || self
                .indications
                .iter()
                .flatten()
                .any(|indication| contains(&indication.description))
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn trim_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        trim_in_place(v);
    }
}

fn trim_list(values: &mut Option<Vec<String>>) {
    for v in values.iter_mut().flatten() {
        trim_in_place(v);
    }
}

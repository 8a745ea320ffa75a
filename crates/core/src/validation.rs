//! Input validation utilities.
//!
//! Requests are validated before they reach [`MedicationService`](crate::MedicationService).
//! Every rule is checked and all violations are reported together, so a client can fix a form
//! in one round trip.

use crate::medication::{Indication, MedicationPatch, NewMedication};
use crate::{MedicationError, MedicationResult};
use serde::Serialize;
use utoipa::ToSchema;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;
pub const DOSAGE_MIN_LEN: usize = 1;
pub const DOSAGE_MAX_LEN: usize = 50;
pub const FREQUENCY_MIN_LEN: usize = 1;
pub const FREQUENCY_MAX_LEN: usize = 100;

/// A single failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    /// Path of the offending field, e.g. `name` or `indications[1].confidence`.
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validates creation input.
///
/// # Errors
///
/// Returns `MedicationError::Validation` listing every violated rule.
pub fn validate_new_medication(input: &NewMedication) -> MedicationResult<()> {
    let mut violations = Vec::new();

    check_length(&mut violations, "name", &input.name, NAME_MIN_LEN, NAME_MAX_LEN);
    check_length(
        &mut violations,
        "dosage",
        &input.dosage,
        DOSAGE_MIN_LEN,
        DOSAGE_MAX_LEN,
    );
    check_length(
        &mut violations,
        "frequency",
        &input.frequency,
        FREQUENCY_MIN_LEN,
        FREQUENCY_MAX_LEN,
    );
    if let Some(indications) = &input.indications {
        check_indications(&mut violations, indications);
    }

    finish(violations)
}

/// Validates a partial update. Only fields present in the patch are checked.
///
/// # Errors
///
/// Returns `MedicationError::Validation` listing every violated rule.
pub fn validate_medication_patch(patch: &MedicationPatch) -> MedicationResult<()> {
    let mut violations = Vec::new();

    if let Some(name) = &patch.name {
        check_length(&mut violations, "name", name, NAME_MIN_LEN, NAME_MAX_LEN);
    }
    if let Some(dosage) = &patch.dosage {
        check_length(
            &mut violations,
            "dosage",
            dosage,
            DOSAGE_MIN_LEN,
            DOSAGE_MAX_LEN,
        );
    }
    if let Some(frequency) = &patch.frequency {
        check_length(
            &mut violations,
            "frequency",
            frequency,
            FREQUENCY_MIN_LEN,
            FREQUENCY_MAX_LEN,
        );
    }
    if let Some(indications) = &patch.indications {
        check_indications(&mut violations, indications);
    }

    finish(violations)
}

fn check_length(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min {
        violations.push(FieldViolation::new(
            field,
            format!("must be at least {} characters", min),
        ));
    } else if len > max {
        violations.push(FieldViolation::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
}

fn check_indications(violations: &mut Vec<FieldViolation>, indications: &[Indication]) {
    for (i, indication) in indications.iter().enumerate() {
        if indication.description.trim().is_empty() {
            violations.push(FieldViolation::new(
                format!("indications[{}].description", i),
                "is required",
            ));
        }
        if let Some(confidence) = indication.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                violations.push(FieldViolation::new(
                    format!("indications[{}].confidence", i),
                    "must be between 0 and 1",
                ));
            }
        }
    }
}

fn finish(violations: Vec<FieldViolation>) -> MedicationResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(MedicationError::Validation(violations))
    }
}

use medication_core::{MedicationError, MedicationResult};

/// Validates a provided API key against the configured one.
///
/// When no key is configured every request is accepted. When one is configured the provided
/// key must be present and equal.
///
/// # Errors
///
/// Returns `MedicationError::Unauthorized` if the key is missing or wrong.
pub fn validate_api_key(expected: Option<&str>, provided: Option<&str>) -> MedicationResult<()> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match provided {
        Some(key) if key == expected => Ok(()),
        Some(_) => Err(MedicationError::Unauthorized("Invalid API key".into())),
        None => Err(MedicationError::Unauthorized("Missing API key".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medication_core::ErrorKind;

    #[test]
    fn test_no_configured_key_accepts_everything() {
        assert!(validate_api_key(None, None).is_ok());
        assert!(validate_api_key(None, Some("anything")).is_ok());
    }

    #[test]
    fn test_matching_key_accepted() {
        assert!(validate_api_key(Some("secret"), Some("secret")).is_ok());
    }

    #[test]
    fn test_wrong_or_missing_key_rejected() {
        let err = validate_api_key(Some("secret"), Some("guess")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = validate_api_key(Some("secret"), None).unwrap_err();
        assert_eq!(err.to_string(), "unauthorized: Missing API key");
    }
}

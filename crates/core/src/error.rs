use crate::validation::FieldViolation;

/// Broad error categories that outer layers translate into transport-level codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    BadRequest,
    Conflict,
    Unauthorized,
    Forbidden,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code for the category.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::BadRequest => "BAD_REQUEST",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MedicationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("medication not found: {0}")]
    NotFound(String),
    #[error("medication already exists: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("invalid medication id: {0}")]
    Id(#[from] medication_uuid::IdError),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write medication file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read medication file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to remove medication record: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize medication: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize medication: {0}")]
    Deserialization(serde_json::Error),
    #[error("storage task failed: {0}")]
    StorageTask(String),
}

impl MedicationError {
    /// Category used by the HTTP layer to pick a status code.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MedicationError::InvalidInput(_) | MedicationError::Validation(_) => {
                ErrorKind::BadRequest
            }
            MedicationError::NotFound(_) => ErrorKind::NotFound,
            MedicationError::Conflict(_) => ErrorKind::Conflict,
            MedicationError::Unauthorized(_) => ErrorKind::Unauthorized,
            MedicationError::Forbidden(_) => ErrorKind::Forbidden,
            MedicationError::Id(_)
            | MedicationError::StorageDirCreation(_)
            | MedicationError::FileWrite(_)
            | MedicationError::FileRead(_)
            | MedicationError::FileRemove(_)
            | MedicationError::Serialization(_)
            | MedicationError::Deserialization(_)
            | MedicationError::StorageTask(_) => ErrorKind::Internal,
        }
    }
}

pub type MedicationResult<T> = std::result::Result<T, MedicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_client_errors() {
        assert_eq!(
            MedicationError::InvalidInput("x".into()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            MedicationError::Validation(vec![]).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            MedicationError::NotFound("abc".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            MedicationError::Conflict("abc".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            MedicationError::Unauthorized("no key".into()).kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_kind_maps_storage_failures_to_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = MedicationError::FileWrite(io);
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.kind().code(), "INTERNAL_SERVER_ERROR");
    }
}

// ⚠️ Error taxonomy for the migration flow
// Lookups and stores fail with their own enums, the facade folds them into MigrationError

use thiserror::Error;

/// Failure of a postal code lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// The directory has no entry for this postal code
    #[error("postal code not found: {0}")]
    NotFound(String),

    /// The backing service could not be reached
    #[error("lookup service unavailable: {0}")]
    Unavailable(String),
}

/// Failure while committing a customer record
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("customer store unavailable: {0}")]
    Unavailable(String),

    #[error("customer store write failed: {0}")]
    Write(#[from] rusqlite::Error),

    #[error("customer report failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode customer event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Coarse classification callers can branch on (retry, report, reject)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    NotFound,
    Unavailable,
    Backend,
}

/// Everything `Facade::migrate_customer` can return
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Input rejected before any subsystem was called
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MigrationError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        MigrationError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrationError::Validation { .. } => ErrorKind::ValidationFailure,
            MigrationError::Lookup(LookupError::NotFound(_)) => ErrorKind::NotFound,
            MigrationError::Lookup(LookupError::Unavailable(_)) => ErrorKind::Unavailable,
            MigrationError::Store(StoreError::Unavailable(_)) => ErrorKind::Unavailable,
            MigrationError::Store(_) => ErrorKind::Backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_separates_not_found_from_unavailable() {
        let not_found: MigrationError = LookupError::NotFound("00000-000".to_string()).into();
        let down: MigrationError = LookupError::Unavailable("timeout".to_string()).into();

        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert_eq!(down.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn test_store_errors_classify() {
        let down: MigrationError = StoreError::Unavailable("lock poisoned".to_string()).into();
        let io: MigrationError =
            StoreError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed")).into();

        assert_eq!(down.kind(), ErrorKind::Unavailable);
        assert_eq!(io.kind(), ErrorKind::Backend);
    }

    #[test]
    fn test_validation_message() {
        let err = MigrationError::validation("name", "must not be blank");

        assert_eq!(err.kind(), ErrorKind::ValidationFailure);
        assert_eq!(err.to_string(), "invalid name: must not be blank");
    }
}

//! Error types for crewroster.
//!
//! This module defines the crate-level error type. Field validation failures
//! live in [`crate::record::FieldError`] and are wrapped here when they cross
//! into roster or application code.

use std::path::PathBuf;
use thiserror::Error;

use crate::record::FieldError;

/// The main error type for crewroster operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// A record field rejected its input or was accessed while unset.
    #[error(transparent)]
    Field(#[from] FieldError),

    // === Roster Errors ===
    /// No record carries the requested pilot id.
    #[error("pilot record ID {id} not found")]
    RecordNotFound {
        /// The id that was looked up.
        id: u32,
    },

    /// The id counter has reached the roster capacity.
    #[error("roster is full: pilot ids are exhausted at {capacity}")]
    CapacityReached {
        /// The configured capacity.
        capacity: u32,
    },

    /// The roster holds no records to show.
    #[error("no pilots entered into the roster")]
    EmptyRoster,

    /// The roster holds no records to save.
    #[error("no roster in memory to save")]
    NothingToSave,

    /// The roster and its counters are already cleared.
    #[error("no roster to reset")]
    NothingToReset,

    // === Persistence Errors ===
    /// No saved roster files were found.
    #[error("no saved roster files in {}", dir.display())]
    NoSavedRosters {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// A roster name contained something other than letters.
    #[error("invalid roster name '{name}': use letters only")]
    InvalidRosterName {
        /// The rejected name.
        name: String,
    },

    /// A roster file did not contain a usable roster.
    #[error("malformed roster file {}: {message}", path.display())]
    MalformedRoster {
        /// Path of the offending file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Standard input was closed while a prompt was waiting.
    #[error("input closed")]
    InputClosed,

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for crewroster operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed roster error.
    #[must_use]
    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedRoster {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if the interactive session can report this error and carry on.
    ///
    /// Everything a user can cause (bad input, unknown ids, a full roster,
    /// missing or broken files) is recoverable. Touching a field the
    /// application removed, and losing standard input, are not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Field(err) => !err.is_programmer_error(),
            Self::InputClosed | Self::ConfigLoad(_) | Self::ConfigValidation { .. } => false,
            _ => true,
        }
    }

    /// Check if this error is a lookup miss.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;

    #[test]
    fn test_error_display() {
        let err = Error::RecordNotFound { id: 7 };
        assert_eq!(err.to_string(), "pilot record ID 7 not found");

        let err = Error::CapacityReached { capacity: 200 };
        assert!(err.to_string().contains("200"));
    }

    #[test]
    fn test_field_error_is_transparent() {
        let err: Error = FieldError::NotPresent(Field::PicHours).into();
        assert_eq!(
            err.to_string(),
            FieldError::NotPresent(Field::PicHours).to_string()
        );
    }

    #[test]
    fn test_recoverable_categories() {
        assert!(Error::RecordNotFound { id: 1 }.is_recoverable());
        assert!(Error::CapacityReached { capacity: 1 }.is_recoverable());
        assert!(Error::EmptyRoster.is_recoverable());
        assert!(Error::NothingToSave.is_recoverable());
        assert!(Error::NothingToReset.is_recoverable());
        assert!(Error::malformed("x.dpb", "bad").is_recoverable());

        let invalid = FieldError::NotANumber {
            field: Field::TotalHours,
            input: "abc".to_string(),
        };
        assert!(Error::from(invalid).is_recoverable());
    }

    #[test]
    fn test_programmer_errors_are_not_recoverable() {
        assert!(!Error::from(FieldError::NotPresent(Field::MiddleName)).is_recoverable());
        assert!(!Error::from(FieldError::Protected(Field::Surname)).is_recoverable());
        assert!(!Error::InputClosed.is_recoverable());
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::RecordNotFound { id: 3 }.is_not_found());
        assert!(!Error::EmptyRoster.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_malformed_roster_display() {
        let err = Error::malformed("/tmp/crew.dpb", "expected an array");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/crew.dpb"));
        assert!(msg.contains("expected an array"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }

    #[test]
    fn test_no_saved_rosters_display() {
        let err = Error::NoSavedRosters {
            dir: PathBuf::from("/data/rosters"),
        };
        assert!(err.to_string().contains("/data/rosters"));
    }
}

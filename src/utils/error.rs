use crate::domain::model::{GroupingResult, ProfileId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroupingError {
    #[error("Invalid record at position {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("Duplicate profile id '{id}' at positions {first} and {second}")]
    DuplicateId {
        id: ProfileId,
        first: usize,
        second: usize,
    },

    #[error("Grouping aborted after {} groups", .partial.points)]
    Aborted { partial: GroupingResult },

    #[error("Grouping task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Search,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GroupingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GroupingError::InvalidRecord { .. }
            | GroupingError::DuplicateId { .. }
            | GroupingError::SerializationError(_) => ErrorCategory::Input,
            GroupingError::Aborted { .. } | GroupingError::TaskError(_) => ErrorCategory::Search,
            GroupingError::IoError(_) | GroupingError::CsvError(_) => ErrorCategory::Io,
            GroupingError::ConfigError { .. }
            | GroupingError::ConfigValidationError { .. }
            | GroupingError::InvalidConfigValueError { .. }
            | GroupingError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        if let GroupingError::TaskError(_) = self {
            return ErrorSeverity::Critical;
        }
        match self.category() {
            ErrorCategory::Search => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GroupingError::InvalidRecord { .. } | GroupingError::SerializationError(_) => {
                "Check that every record has id, gender, emotion, age and race with known values"
            }
            GroupingError::DuplicateId { .. } => "Make profile ids unique before grouping",
            GroupingError::Aborted { .. } => {
                "Raise the timeout or shrink the population; the search is exhaustive"
            }
            GroupingError::IoError(_) | GroupingError::CsvError(_) => {
                "Check that the input exists and the output directory is writable"
            }
            _ => "Review the configuration file and command line flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GroupingError::DuplicateId { id, .. } => {
                format!("The input contains the id '{}' more than once", id)
            }
            GroupingError::Aborted { partial } => format!(
                "Grouping stopped early; {} groups were formed before the abort",
                partial.points
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GroupingError>;

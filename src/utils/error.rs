use thiserror::Error;

#[derive(Error, Debug)]
pub enum ErpError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid {document} status transition: {from} -> {to}")]
    InvalidTransition {
        document: String,
        from: String,
        to: String,
    },

    #[error("Mapping '{mapping}' error: {message}")]
    MappingError { mapping: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Io,
    Data,
    Configuration,
    BusinessRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErpError {
    pub fn validation(message: impl Into<String>) -> Self {
        ErpError::ValidationError {
            message: message.into(),
        }
    }

    pub fn mapping(mapping: &str, message: impl Into<String>) -> Self {
        ErpError::MappingError {
            mapping: mapping.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErpError::ApiError(_) => ErrorCategory::Network,
            ErpError::IoError(_) | ErpError::ZipError(_) => ErrorCategory::Io,
            ErpError::CsvError(_)
            | ErpError::SerializationError(_)
            | ErpError::ProcessingError { .. } => ErrorCategory::Data,
            ErpError::TomlError(_)
            | ErpError::ConfigError { .. }
            | ErpError::MissingConfigError { .. }
            | ErpError::InvalidConfigValueError { .. }
            | ErpError::MappingError { .. } => ErrorCategory::Configuration,
            ErpError::ValidationError { .. } | ErpError::InvalidTransition { .. } => {
                ErrorCategory::BusinessRule
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErpError::ApiError(_) => ErrorSeverity::Medium,
            ErpError::ValidationError { .. } | ErpError::InvalidTransition { .. } => {
                ErrorSeverity::High
            }
            ErpError::IoError(_) | ErpError::ZipError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ErpError::ApiError(_) => "Could not fetch records from the remote source".to_string(),
            ErpError::IoError(e) => format!("File system error: {}", e),
            ErpError::InvalidTransition { document, from, to } => {
                format!("A {} cannot move from '{}' to '{}'", document, from, to)
            }
            ErpError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the source endpoint and network connectivity, then retry",
            ErrorCategory::Io => "Check that the paths exist and are writable",
            ErrorCategory::Data => "Inspect the input records for malformed values",
            ErrorCategory::Configuration => "Review the configuration file against the documented format",
            ErrorCategory::BusinessRule => "Correct the input so it satisfies the business rule",
        }
    }
}

pub type Result<T> = std::result::Result<T, ErpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_is_business_rule() {
        let err = ErpError::InvalidTransition {
            document: "bill_of_lading".to_string(),
            from: "released".to_string(),
            to: "draft".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::BusinessRule);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("'released'"));
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = ErpError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}

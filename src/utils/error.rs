use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid scan date '{input}': expected YYYY-MM-DD")]
    InvalidScanDate { input: String },

    #[error("Report header has {found} columns, at least {required} required")]
    HeaderError { found: usize, required: usize },

    #[error("Malformed row at line {line}: {reason}")]
    RowShapeError { line: u64, reason: String },

    #[error("Cannot parse interval '{input}': {reason}")]
    DateParseError { input: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InvalidScanDate { .. } => ErrorCategory::Input,
            EtlError::HeaderError { .. }
            | EtlError::RowShapeError { .. }
            | EtlError::DateParseError { .. } => ErrorCategory::Data,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::InvalidScanDate { .. } => {
                "Enter the date as YYYY-MM-DD, or leave it blank for the default lookback".to_string()
            }
            EtlError::HeaderError { .. } => {
                "Check that the report export still has the expected column layout, or adjust [columns] in the config".to_string()
            }
            EtlError::RowShapeError { .. } | EtlError::DateParseError { .. } => {
                "Fix the offending row in the report, or rerun with --on-malformed skip".to_string()
            }
            EtlError::ConfigValidationError { field, .. }
            | EtlError::InvalidConfigValueError { field, .. } => {
                format!("Review the '{}' setting in the configuration", field)
            }
            EtlError::CsvError(_) => {
                "Make sure the report is saved as UTF-8 CSV".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the report file exists and the output location is writable".to_string()
            }
            EtlError::SerializationError(_) => {
                "Report this as a bug together with the input report".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Invalid input: {}", self),
            ErrorCategory::Data => format!("The report could not be processed: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// Exit code for the binary, derived from severity.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;

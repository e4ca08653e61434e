use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Input is missing required column '{column}' (available columns: {})", .available.join(", "))]
    MissingColumnError {
        column: String,
        available: Vec<String>,
    },

    #[error("{backend} generation failed: {message}")]
    GenerationError { backend: String, message: String },

    #[error("{backend} returned a malformed response: {message}")]
    MalformedResponseError { backend: String, message: String },

    #[error("Failed to write output '{path}': {message}")]
    OutputWriteError { path: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 逾時、非 2xx、DNS 失敗
    Network,
    /// 生成服務回傳無法解析的內容
    MalformedResponse,
    /// 輸入表格或配置不合法，處理前即中止
    InputValidation,
    /// 結果檔寫入失敗
    OutputWrite,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EnrichError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EnrichError::ApiError(_) | EnrichError::GenerationError { .. } => {
                ErrorCategory::Network
            }
            EnrichError::MalformedResponseError { .. } => ErrorCategory::MalformedResponse,
            EnrichError::CsvError(_)
            | EnrichError::MissingColumnError { .. }
            | EnrichError::ValidationError { .. } => ErrorCategory::InputValidation,
            EnrichError::OutputWriteError { .. } => ErrorCategory::OutputWrite,
            EnrichError::ConfigValidationError { .. }
            | EnrichError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EnrichError::IoError(_) | EnrichError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::MalformedResponse => ErrorSeverity::Medium,
            ErrorCategory::InputValidation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::OutputWrite => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EnrichError::MissingColumnError { column, .. } => {
                format!("Add a '{}' header to the first row of the input CSV", column)
            }
            EnrichError::CsvError(_) => {
                "Check that the input file is a valid comma-separated CSV".to_string()
            }
            EnrichError::OutputWriteError { .. } => {
                "Check write permissions for the output directory or pass --output".to_string()
            }
            EnrichError::ApiError(_) | EnrichError::GenerationError { .. } => {
                "Check network connectivity and API credentials".to_string()
            }
            EnrichError::MalformedResponseError { .. } => {
                "The generation backend returned unexpected output; rerun or drop the API key to use keyword analysis".to_string()
            }
            EnrichError::ConfigValidationError { .. } | EnrichError::InvalidConfigValueError { .. } => {
                "Review the command-line flags or the TOML configuration file".to_string()
            }
            EnrichError::IoError(_) => "Check that the input file exists and is readable".to_string(),
            EnrichError::ProcessingError { .. } | EnrichError::ValidationError { .. } => {
                "Inspect the input data and rerun with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EnrichError::MissingColumnError { column, available } => format!(
                "The input CSV must contain a '{}' column. Found: {}",
                column,
                if available.is_empty() {
                    "(no columns)".to_string()
                } else {
                    available.join(", ")
                }
            ),
            EnrichError::IoError(e) => format!("File access failed: {}", e),
            EnrichError::OutputWriteError { path, .. } => {
                format!("Could not save results to {}", path)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;

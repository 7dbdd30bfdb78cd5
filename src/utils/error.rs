use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaestroError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiResponseError { status: u16, body: String },

    #[error("API response contained no message content")]
    EmptyResponse,

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

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

    #[error("Inventory error: {message}")]
    InventoryError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MaestroError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MaestroError::ApiError(_) => ErrorCategory::Network,
            MaestroError::ApiResponseError { .. } | MaestroError::EmptyResponse => {
                ErrorCategory::Api
            }
            MaestroError::CsvError(_)
            | MaestroError::SerializationError(_)
            | MaestroError::InventoryError { .. }
            | MaestroError::ProcessingError { .. } => ErrorCategory::Data,
            MaestroError::IoError(_) => ErrorCategory::Storage,
            MaestroError::TomlError(_)
            | MaestroError::ConfigValidationError { .. }
            | MaestroError::InvalidConfigValueError { .. }
            | MaestroError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MaestroError::EmptyResponse => ErrorSeverity::Low,
            MaestroError::ApiError(_) => ErrorSeverity::Medium,
            MaestroError::ApiResponseError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            MaestroError::ApiResponseError { .. }
            | MaestroError::CsvError(_)
            | MaestroError::SerializationError(_)
            | MaestroError::InventoryError { .. }
            | MaestroError::ProcessingError { .. } => ErrorSeverity::High,
            MaestroError::IoError(_)
            | MaestroError::TomlError(_)
            | MaestroError::ConfigValidationError { .. }
            | MaestroError::InvalidConfigValueError { .. }
            | MaestroError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether a chat request that failed this way is worth sending again.
    pub fn is_retryable(&self) -> bool {
        match self {
            MaestroError::ApiError(e) => !e.is_builder() && !e.is_decode(),
            MaestroError::ApiResponseError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            MaestroError::ApiError(_) => {
                "Check your network connection and the --api-base URL, then try again".to_string()
            }
            MaestroError::ApiResponseError { status: 401, .. } => {
                "Check that OPENAI_API_KEY holds a valid key".to_string()
            }
            MaestroError::ApiResponseError { status: 429, .. } => {
                "The API is rate limiting requests; wait a moment before retrying".to_string()
            }
            MaestroError::ApiResponseError { status: 404, .. } => {
                "Check the --model name and the --api-base URL".to_string()
            }
            MaestroError::ApiResponseError { .. } => {
                "The API rejected the request; retry later or inspect the response body".to_string()
            }
            MaestroError::EmptyResponse => "Ask the question again".to_string(),
            MaestroError::CsvError(_) | MaestroError::InventoryError { .. } => {
                "Make sure the inventory file is a CSV with a header row".to_string()
            }
            MaestroError::IoError(_) => {
                "Check that the path exists and is readable/writable".to_string()
            }
            MaestroError::SerializationError(_) | MaestroError::ProcessingError { .. } => {
                "Check the JSON file is not corrupted".to_string()
            }
            MaestroError::TomlError(_) => "Fix the TOML syntax in the config file".to_string(),
            MaestroError::MissingConfigError { field } => {
                format!("Provide '{}' via the command line, config file or environment", field)
            }
            MaestroError::ConfigValidationError { .. }
            | MaestroError::InvalidConfigValueError { .. } => {
                "Review the configuration values and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the chat service: {}", self),
            ErrorCategory::Api => format!("The chat service returned an error: {}", self),
            ErrorCategory::Data => format!("Inventory data problem: {}", self),
            ErrorCategory::Storage => format!("File access problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, MaestroError>;

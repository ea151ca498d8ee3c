use thiserror::Error;

/// Main error type for the optimization core
#[derive(Error, Debug)]
pub enum BbxError {
    #[error("Invalid domain for variable {name}: min {min} is not <= max {max}")]
    InvalidDomain { name: String, min: f64, max: f64 },

    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Duplicate variable: {name}")]
    DuplicateVariable { name: String },

    #[error("Parameter vector has already been disposed")]
    Disposed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for optimization operations
pub type BbxResult<T> = Result<T, BbxError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::BbxError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::BbxError::Config(format!($($arg)*))
    };
}

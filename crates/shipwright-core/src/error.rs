//! Error types for the Shipwright core library.

use thiserror::Error;

/// Core error type for variant resolution.
///
/// Messages never carry credential values. `MissingSigningMaterial` names
/// the missing fields, not their contents.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown variant '{name}' (declared: {})", .declared.join(", "))]
    UnknownVariant { name: String, declared: Vec<String> },

    #[error("Missing signing material for variant '{variant}': {reason}")]
    MissingSigningMaterial { variant: String, reason: String },

    #[error(
        "Invalid SDK bounds in {context}: expected min ({min}) <= target ({target}) <= compile ({compile})"
    )]
    InvalidSdkBounds {
        context: String,
        min: u32,
        target: u32,
        compile: u32,
    },

    #[error("Unknown architecture: {0}")]
    UnknownArchitecture(String),

    #[error("Architecture '{abi}' is not enabled for variant '{variant}'")]
    UnsupportedArchitecture { variant: String, abi: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signing error: {0}")]
    Signing(String),
}

/// Result type alias for Shipwright operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

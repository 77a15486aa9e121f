//! Shipwright Core Library
//!
//! Build-variant resolution and release signing selection for Flutter apps
//! with an Android host project.

pub mod config;
pub mod error;
pub mod flutter;
pub mod models;
pub mod resolver;
pub mod signing;

pub use config::{
    BuildDeclarations, ConfigFormat, load_declarations, parse_declarations, parse_declarations_auto,
};
pub use error::{ConfigError, Result};
pub use resolver::{ResolvedConfig, SigningHandle, SigningMode, VariantResolver};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

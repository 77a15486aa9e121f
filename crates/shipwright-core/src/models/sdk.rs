//! Android SDK level bounds.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Minimum, target and compile SDK levels.
///
/// Undeclared levels fall back to the Flutter Gradle plugin defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkBounds {
    #[serde(default = "default_min_sdk")]
    pub min_sdk: u32,
    #[serde(default = "default_target_sdk")]
    pub target_sdk: u32,
    #[serde(default = "default_compile_sdk")]
    pub compile_sdk: u32,
}

fn default_min_sdk() -> u32 {
    21
}

fn default_target_sdk() -> u32 {
    35
}

fn default_compile_sdk() -> u32 {
    35
}

impl Default for SdkBounds {
    fn default() -> Self {
        Self {
            min_sdk: default_min_sdk(),
            target_sdk: default_target_sdk(),
            compile_sdk: default_compile_sdk(),
        }
    }
}

impl SdkBounds {
    pub fn new(min_sdk: u32, target_sdk: u32, compile_sdk: u32) -> Self {
        Self {
            min_sdk,
            target_sdk,
            compile_sdk,
        }
    }

    /// Checks `min_sdk <= target_sdk <= compile_sdk`.
    pub fn validate(&self, context: &str) -> Result<()> {
        if self.min_sdk > self.target_sdk || self.target_sdk > self.compile_sdk {
            return Err(ConfigError::InvalidSdkBounds {
                context: context.to_string(),
                min: self.min_sdk,
                target: self.target_sdk,
                compile: self.compile_sdk,
            });
        }
        Ok(())
    }
}

/// Per-variant override of individual SDK levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SdkOverride {
    #[serde(default)]
    pub min_sdk: Option<u32>,
    #[serde(default)]
    pub target_sdk: Option<u32>,
    #[serde(default)]
    pub compile_sdk: Option<u32>,
}

impl SdkOverride {
    /// Applies the override on top of project-level bounds.
    pub fn apply(&self, base: SdkBounds) -> SdkBounds {
        SdkBounds {
            min_sdk: self.min_sdk.unwrap_or(base.min_sdk),
            target_sdk: self.target_sdk.unwrap_or(base.target_sdk),
            compile_sdk: self.compile_sdk.unwrap_or(base.compile_sdk),
        }
    }
}

//! Application identity and toolchain settings shared by every variant.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use super::SdkBounds;
use crate::error::{ConfigError, Result};

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(\.[A-Za-z][A-Za-z0-9_]*)+$")
        .expect("package name pattern is valid")
});

/// Project-level Android configuration (the `defaultConfig` block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AndroidProject {
    /// Namespace for generated R and BuildConfig classes.
    pub namespace: String,
    /// Application ID; defaults to the namespace.
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default = "default_version_code")]
    pub version_code: u32,
    #[serde(default = "default_version_name")]
    pub version_name: String,
    #[serde(default)]
    pub ndk_version: Option<String>,
    /// JVM bytecode target for Java and Kotlin sources.
    #[serde(default = "default_jvm_target")]
    pub jvm_target: u32,
    #[serde(default)]
    pub sdk: SdkBounds,
}

fn default_version_code() -> u32 {
    1
}

fn default_version_name() -> String {
    "1.0.0".to_string()
}

fn default_jvm_target() -> u32 {
    17
}

impl AndroidProject {
    /// Creates a project with defaults for everything but the namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            application_id: None,
            version_code: default_version_code(),
            version_name: default_version_name(),
            ndk_version: None,
            jvm_target: default_jvm_target(),
            sdk: SdkBounds::default(),
        }
    }

    /// Application ID without any variant suffix.
    pub fn base_application_id(&self) -> &str {
        self.application_id.as_deref().unwrap_or(&self.namespace)
    }

    pub fn validate(&self) -> Result<()> {
        validate_package_name("namespace", &self.namespace)?;
        validate_package_name("application_id", self.base_application_id())?;
        if self.version_code == 0 {
            return Err(ConfigError::Validation("version_code must be > 0".to_string()));
        }
        self.sdk.validate("project")
    }
}

/// Checks that `value` is a dot-separated Java package name.
pub fn validate_package_name(field: &str, value: &str) -> Result<()> {
    if PACKAGE_NAME.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "{} '{}' is not a valid package name",
            field, value
        )))
    }
}

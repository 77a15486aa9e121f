//! Build variant models.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ArchitectureFilter, SdkOverride};
use crate::error::ConfigError;

/// The build modes a Flutter Android project declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Debug,
    Profile,
    Release,
}

impl VariantKind {
    pub const ALL: [VariantKind; 3] =
        [VariantKind::Debug, VariantKind::Profile, VariantKind::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Debug => "debug",
            VariantKind::Profile => "profile",
            VariantKind::Release => "release",
        }
    }

    /// Whether resolution must fail without a complete signing identity.
    pub fn requires_signing(&self) -> bool {
        matches!(self, VariantKind::Release)
    }
}

impl std::str::FromStr for VariantKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(VariantKind::Debug),
            "profile" => Ok(VariantKind::Profile),
            "release" => Ok(VariantKind::Release),
            _ => Err(ConfigError::UnknownVariant {
                name: s.to_string(),
                declared: VariantKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
            }),
        }
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A code shrinking rule file applied by R8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShrinkRule {
    /// Rule file bundled with the Android Gradle plugin,
    /// e.g. `proguard-android-optimize.txt`.
    Toolchain { default: String },
    /// Rule file inside the project, e.g. `proguard-rules.pro`.
    File(PathBuf),
}

impl std::fmt::Display for ShrinkRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShrinkRule::Toolchain { default } => write!(f, "default:{}", default),
            ShrinkRule::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A declared build variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildVariant {
    pub kind: VariantKind,
    pub minify_enabled: bool,
    pub shrink_resources: bool,
    /// Ordered; later files override earlier ones.
    pub proguard_files: Vec<ShrinkRule>,
    /// Name of a declared signing identity.
    pub signing: Option<String>,
    pub abi_filter: ArchitectureFilter,
    pub sdk: SdkOverride,
    pub application_id_suffix: Option<String>,
    pub debuggable: bool,
}

impl BuildVariant {
    /// The variant as the toolchain defines it when nothing is declared.
    pub fn implicit(kind: VariantKind) -> Self {
        Self {
            kind,
            minify_enabled: false,
            shrink_resources: false,
            proguard_files: Vec::new(),
            signing: None,
            abi_filter: ArchitectureFilter::All,
            sdk: SdkOverride::default(),
            application_id_suffix: None,
            debuggable: kind == VariantKind::Debug,
        }
    }
}

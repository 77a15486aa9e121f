//! Build declarations: the explicit configuration a resolver is built from.
//!
//! Declarations are loaded once, validated, and never mutated afterwards.

pub mod parser;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::models::{
    AndroidProject, BuildVariant, SigningIdentity, VariantKind, validate_package_name,
};

pub use parser::*;

/// The full static declaration set for one Android project.
#[derive(Debug, Clone)]
pub struct BuildDeclarations {
    pub project: AndroidProject,
    /// Signing identities by name.
    pub signing: BTreeMap<String, Arc<SigningIdentity>>,
    /// Always contains every [`VariantKind`].
    pub variants: BTreeMap<VariantKind, BuildVariant>,
}

impl BuildDeclarations {
    /// Creates declarations with the implicit debug, profile and release variants.
    pub fn new(project: AndroidProject) -> Self {
        let variants = VariantKind::ALL
            .into_iter()
            .map(|kind| (kind, BuildVariant::implicit(kind)))
            .collect();

        Self {
            project,
            signing: BTreeMap::new(),
            variants,
        }
    }

    /// Replaces the declaration for the variant's kind.
    pub fn with_variant(mut self, variant: BuildVariant) -> Self {
        self.variants.insert(variant.kind, variant);
        self
    }

    /// Adds a signing identity, keyed by its name.
    pub fn with_signing(mut self, identity: SigningIdentity) -> Self {
        self.signing
            .insert(identity.name().to_string(), Arc::new(identity));
        self
    }

    pub fn variant(&self, kind: VariantKind) -> Option<&BuildVariant> {
        self.variants.get(&kind)
    }

    pub fn signing_identity(&self, name: &str) -> Option<&Arc<SigningIdentity>> {
        self.signing.get(name)
    }

    /// Names of declared variants, in declaration order.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.keys().map(|k| k.as_str().to_string()).collect()
    }

    /// Validates everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        self.project.validate()?;

        for (kind, variant) in &self.variants {
            variant
                .sdk
                .apply(self.project.sdk)
                .validate(&format!("variant '{}'", kind))?;

            if let Some(suffix) = &variant.application_id_suffix {
                let application_id = format!("{}{}", self.project.base_application_id(), suffix);
                validate_package_name("application_id", &application_id)?;
            }

            if let Some(name) = &variant.signing {
                if !self.signing.contains_key(name) {
                    tracing::warn!(
                        "Variant '{}' references undeclared signing identity '{}'",
                        kind,
                        name
                    );
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::models::{SdkBounds, SdkOverride};

    #[test]
    fn test_new_declares_all_variants() {
        let declarations = BuildDeclarations::new(AndroidProject::new("com.example.app"));
        assert_eq!(declarations.variant_names(), vec!["debug", "profile", "release"]);
        assert!(declarations.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_variant_sdk_override() {
        let mut release = BuildVariant::implicit(VariantKind::Release);
        release.sdk = SdkOverride {
            min_sdk: Some(36),
            ..Default::default()
        };
        let declarations =
            BuildDeclarations::new(AndroidProject::new("com.example.app")).with_variant(release);

        let err = declarations.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidSdkBounds { ref context, .. } if context == "variant 'release'"
        ));
    }

    #[test]
    fn test_validate_rejects_project_sdk_bounds() {
        let mut project = AndroidProject::new("com.example.app");
        project.sdk = SdkBounds::new(21, 34, 33);
        let err = BuildDeclarations::new(project).validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSdkBounds { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_application_id_suffix() {
        let mut debug = BuildVariant::implicit(VariantKind::Debug);
        debug.application_id_suffix = Some("..debug".to_string());
        let declarations =
            BuildDeclarations::new(AndroidProject::new("com.example.app")).with_variant(debug);
        assert!(declarations.validate().is_err());
    }

    #[test]
    fn test_dangling_signing_reference_is_not_a_load_error() {
        let mut release = BuildVariant::implicit(VariantKind::Release);
        release.signing = Some("missing".to_string());
        let declarations =
            BuildDeclarations::new(AndroidProject::new("com.example.app")).with_variant(release);
        assert!(declarations.validate().is_ok());
    }
}

//! Build variant resolver.
//!
//! Maps a requested variant name and architecture set to a fully resolved
//! build configuration. Release variants fail hard without complete signing
//! material; there is no fallback to the debug key.

use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::config::BuildDeclarations;
use crate::error::{ConfigError, Result};
use crate::models::{
    Abi, ArchitectureFilter, BuildVariant, SdkBounds, ShrinkRule, SigningIdentity, VariantKind,
};

/// Shared reference to a validated signing identity.
///
/// Credentials are only reachable through the packaging functions in
/// [`crate::signing`]. `Debug` and `Serialize` show the identity name,
/// keystore path and alias.
#[derive(Clone)]
pub struct SigningHandle(Arc<SigningIdentity>);

impl SigningHandle {
    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn store_file(&self) -> &std::path::Path {
        self.0.store_file()
    }

    pub fn key_alias(&self) -> &str {
        self.0.key_alias()
    }

    pub(crate) fn identity(&self) -> &SigningIdentity {
        &self.0
    }
}

impl PartialEq for SigningHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.same_material(&other.0)
    }
}

impl std::fmt::Debug for SigningHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningHandle")
            .field("name", &self.name())
            .field("store_file", &self.store_file())
            .field("key_alias", &self.key_alias())
            .finish_non_exhaustive()
    }
}

impl Serialize for SigningHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SigningHandle", 3)?;
        state.serialize_field("identity", self.name())?;
        state.serialize_field("store_file", &self.store_file().display().to_string())?;
        state.serialize_field("key_alias", self.key_alias())?;
        state.end()
    }
}

/// Which key signs the package.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SigningMode {
    /// The toolchain's auto-generated debug key. Never selected for release.
    DebugKey,
    Identity(SigningHandle),
}

impl SigningMode {
    pub fn handle(&self) -> Option<&SigningHandle> {
        match self {
            SigningMode::DebugKey => None,
            SigningMode::Identity(handle) => Some(handle),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SigningMode::DebugKey => "debug_key",
            SigningMode::Identity(_) => "identity",
        }
    }
}

/// A fully resolved build configuration, ready for the packaging step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub variant: VariantKind,
    pub namespace: String,
    pub application_id: String,
    pub version_code: u32,
    pub version_name: String,
    pub sdk: SdkBounds,
    pub ndk_version: Option<String>,
    pub jvm_target: u32,
    pub minify_enabled: bool,
    pub shrink_resources: bool,
    pub proguard_files: Vec<ShrinkRule>,
    pub debuggable: bool,
    pub abi_filter: ArchitectureFilter,
    pub signing: SigningMode,
}

/// Resolves variants against a fixed set of declarations.
///
/// Holds only immutable data; share it across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct VariantResolver {
    declarations: BuildDeclarations,
}

impl VariantResolver {
    /// Creates a resolver, validating the declarations first.
    pub fn new(declarations: BuildDeclarations) -> Result<Self> {
        declarations.validate()?;
        Ok(Self { declarations })
    }

    pub fn declarations(&self) -> &BuildDeclarations {
        &self.declarations
    }

    /// Resolves `variant_name` for the requested ABIs.
    ///
    /// An empty request keeps the variant's own filter. A non-empty request
    /// narrows the build to exactly those ABIs, each of which must be enabled
    /// for the variant.
    pub fn resolve(&self, variant_name: &str, requested: &[Abi]) -> Result<ResolvedConfig> {
        let kind = variant_name.parse::<VariantKind>()?;
        let variant = self
            .declarations
            .variant(kind)
            .ok_or_else(|| ConfigError::UnknownVariant {
                name: variant_name.to_string(),
                declared: self.declarations.variant_names(),
            })?;

        let project = &self.declarations.project;
        let sdk = variant.sdk.apply(project.sdk);
        sdk.validate(&format!("variant '{}'", kind))?;

        let signing = self.select_signing(variant)?;
        let abi_filter = narrow_filter(variant, requested)?;

        let application_id = match &variant.application_id_suffix {
            Some(suffix) => format!("{}{}", project.base_application_id(), suffix),
            None => project.base_application_id().to_string(),
        };

        tracing::debug!(
            variant = %kind,
            abis = %abi_filter,
            signing = signing.as_str(),
            minify = variant.minify_enabled,
            "Resolved build variant"
        );

        Ok(ResolvedConfig {
            variant: kind,
            namespace: project.namespace.clone(),
            application_id,
            version_code: project.version_code,
            version_name: project.version_name.clone(),
            sdk,
            ndk_version: project.ndk_version.clone(),
            jvm_target: project.jvm_target,
            minify_enabled: variant.minify_enabled,
            shrink_resources: variant.shrink_resources,
            proguard_files: variant.proguard_files.clone(),
            debuggable: variant.debuggable,
            abi_filter,
            signing,
        })
    }

    /// Parses ABI names and resolves. Unknown names fail with
    /// [`ConfigError::UnknownArchitecture`].
    pub fn resolve_named<S: AsRef<str>>(
        &self,
        variant_name: &str,
        requested: &[S],
    ) -> Result<ResolvedConfig> {
        let abis = requested
            .iter()
            .map(|name| name.as_ref().parse::<Abi>())
            .collect::<Result<Vec<_>>>()?;
        self.resolve(variant_name, &abis)
    }

    fn select_signing(&self, variant: &BuildVariant) -> Result<SigningMode> {
        if variant.kind.requires_signing() {
            let name = variant
                .signing
                .as_deref()
                .ok_or_else(|| missing(variant.kind, "no signing identity attached".to_string()))?;
            let identity = self.checked_identity(variant.kind, name)?;
            return Ok(SigningMode::Identity(SigningHandle(identity)));
        }

        let Some(name) = variant.signing.as_deref() else {
            return Ok(SigningMode::DebugKey);
        };

        match self.checked_identity(variant.kind, name) {
            Ok(identity) => Ok(SigningMode::Identity(SigningHandle(identity))),
            Err(e) => {
                tracing::warn!("{}; signing {} with the debug key", e, variant.kind);
                Ok(SigningMode::DebugKey)
            }
        }
    }

    /// Looks up an identity and checks its fields and keystore file.
    fn checked_identity(&self, kind: VariantKind, name: &str) -> Result<Arc<SigningIdentity>> {
        let identity = self
            .declarations
            .signing_identity(name)
            .ok_or_else(|| missing(kind, format!("signing identity '{}' is not declared", name)))?;

        let missing_fields = identity.missing_fields();
        if !missing_fields.is_empty() {
            return Err(missing(
                kind,
                format!(
                    "signing identity '{}' has empty {}",
                    name,
                    missing_fields.join(", ")
                ),
            ));
        }

        if !identity.store_file().is_file() {
            return Err(missing(
                kind,
                format!("keystore file not found: {}", identity.store_file().display()),
            ));
        }

        Ok(Arc::clone(identity))
    }
}

fn missing(kind: VariantKind, reason: String) -> ConfigError {
    ConfigError::MissingSigningMaterial {
        variant: kind.to_string(),
        reason,
    }
}

fn narrow_filter(variant: &BuildVariant, requested: &[Abi]) -> Result<ArchitectureFilter> {
    if requested.is_empty() {
        return Ok(variant.abi_filter.clone());
    }

    if let Some(abi) = requested.iter().find(|abi| !variant.abi_filter.contains(**abi)) {
        return Err(ConfigError::UnsupportedArchitecture {
            variant: variant.kind.to_string(),
            abi: abi.to_string(),
        });
    }

    Ok(ArchitectureFilter::Only(requested.iter().copied().collect()))
}

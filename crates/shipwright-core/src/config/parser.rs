//! Declarations parser.
//!
//! Supports both YAML and HUML formats.
//!
//! ```yaml
//! project:
//!   namespace: string          # Java package, required
//!   application_id: string     # Defaults to namespace
//!   version_code: int          # Default 1
//!   version_name: string       # Default "1.0.0"
//!   ndk_version: string
//!   jvm_target: int            # Default 17
//!   sdk:
//!     min_sdk: int             # Default 21
//!     target_sdk: int          # Default 35
//!     compile_sdk: int         # Default 35
//! signing:
//!   <name>:
//!     store_file: path         # Relative to the declarations file
//!     store_password: string | { env: VAR }
//!     key_alias: string
//!     key_password: string | { env: VAR }
//! variants:
//!   debug | profile | release:
//!     minify_enabled: bool
//!     shrink_resources: bool
//!     proguard_files:
//!       - default: proguard-android-optimize.txt
//!       - proguard-rules.pro
//!     signing: <name>
//!     abi_filters: [arm64-v8a, x86_64]   # Absent or empty: all ABIs
//!     sdk: { min_sdk, target_sdk, compile_sdk }
//!     application_id_suffix: string
//!     debuggable: bool
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;

use super::BuildDeclarations;
use crate::error::{ConfigError, Result};
use crate::models::{
    Abi, AndroidProject, ArchitectureFilter, BuildVariant, SdkOverride, ShrinkRule,
    SigningIdentity, VariantKind,
};

/// Format of the declarations document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Huml,
}

impl ConfigFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Huml => "huml",
        }
    }
}

impl std::fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationsDocument {
    project: AndroidProject,
    #[serde(default)]
    signing: HashMap<String, SigningDeclaration>,
    #[serde(default)]
    variants: HashMap<String, VariantDeclaration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SigningDeclaration {
    #[serde(default)]
    store_file: String,
    #[serde(default)]
    store_password: SecretValue,
    #[serde(default)]
    key_alias: String,
    #[serde(default)]
    key_password: SecretValue,
}

/// A password given inline or by environment variable name.
#[derive(Deserialize)]
#[serde(untagged)]
enum SecretValue {
    Env { env: String },
    Literal(String),
}

impl Default for SecretValue {
    fn default() -> Self {
        SecretValue::Literal(String::new())
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretValue::Env { env } => write!(f, "Env({})", env),
            SecretValue::Literal(_) => write!(f, "Literal([REDACTED])"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariantDeclaration {
    #[serde(default)]
    minify_enabled: Option<bool>,
    #[serde(default)]
    shrink_resources: Option<bool>,
    #[serde(default)]
    proguard_files: Vec<ShrinkRule>,
    #[serde(default)]
    signing: Option<String>,
    #[serde(default)]
    abi_filters: Option<Vec<Abi>>,
    #[serde(default)]
    sdk: SdkOverride,
    #[serde(default)]
    application_id_suffix: Option<String>,
    #[serde(default)]
    debuggable: Option<bool>,
}

impl VariantDeclaration {
    fn into_variant(self, kind: VariantKind) -> BuildVariant {
        let implicit = BuildVariant::implicit(kind);
        BuildVariant {
            kind,
            minify_enabled: self.minify_enabled.unwrap_or(implicit.minify_enabled),
            shrink_resources: self.shrink_resources.unwrap_or(implicit.shrink_resources),
            proguard_files: self.proguard_files,
            signing: self.signing,
            abi_filter: ArchitectureFilter::from_declared(self.abi_filters.as_deref()),
            sdk: self.sdk,
            application_id_suffix: self.application_id_suffix,
            debuggable: self.debuggable.unwrap_or(implicit.debuggable),
        }
    }
}

/// Parses a YAML declarations document.
///
/// Relative keystore paths are resolved against `base_dir` when given.
/// Unknown keys are rejected so a misspelled setting never falls back to
/// its default.
pub fn parse_declarations(
    yaml_content: &str,
    base_dir: Option<&Path>,
) -> Result<BuildDeclarations> {
    let document: DeclarationsDocument = serde_yaml::from_str(yaml_content)
        .map_err(|e| ConfigError::Parse(format!("Invalid YAML: {}", e)))?;

    build_declarations(document, base_dir)
}

/// Parses a HUML declarations document.
pub fn parse_declarations_huml(
    huml_content: &str,
    base_dir: Option<&Path>,
) -> Result<BuildDeclarations> {
    let document: DeclarationsDocument = huml_rs::serde::from_str(huml_content)
        .map_err(|e| ConfigError::Parse(format!("Invalid HUML: {}", e)))?;

    build_declarations(document, base_dir)
}

/// Parses declarations, auto-detecting format from content.
///
/// - If starts with `%HUML` → parse as HUML
/// - Otherwise → parse as YAML
pub fn parse_declarations_auto(
    content: &str,
    base_dir: Option<&Path>,
) -> Result<(BuildDeclarations, ConfigFormat)> {
    if content.trim_start().starts_with("%HUML") {
        let declarations = parse_declarations_huml(content, base_dir)?;
        Ok((declarations, ConfigFormat::Huml))
    } else {
        let declarations = parse_declarations(content, base_dir)?;
        Ok((declarations, ConfigFormat::Yaml))
    }
}

/// Reads and parses a declarations file.
pub fn load_declarations(path: &Path) -> Result<BuildDeclarations> {
    let content = std::fs::read_to_string(path)?;
    let (declarations, format) = parse_declarations_auto(&content, path.parent())?;
    tracing::debug!("Loaded {} build declarations from {}", format, path.display());
    Ok(declarations)
}

fn build_declarations(
    document: DeclarationsDocument,
    base_dir: Option<&Path>,
) -> Result<BuildDeclarations> {
    let mut declarations = BuildDeclarations::new(document.project);

    for (name, signing) in document.signing {
        declarations = declarations.with_signing(build_identity(name, signing, base_dir));
    }

    for (name, variant) in document.variants {
        let kind = name.parse::<VariantKind>().map_err(|_| {
            ConfigError::Validation(format!(
                "Unsupported variant '{}': expected one of debug, profile, release",
                name
            ))
        })?;
        declarations = declarations.with_variant(variant.into_variant(kind));
    }

    declarations.validate()?;
    Ok(declarations)
}

fn build_identity(
    name: String,
    declaration: SigningDeclaration,
    base_dir: Option<&Path>,
) -> SigningIdentity {
    let store_file = resolve_store_file(&declaration.store_file, base_dir);
    let store_password = resolve_secret(&name, "store_password", declaration.store_password);
    let key_password = resolve_secret(&name, "key_password", declaration.key_password);

    SigningIdentity::new(
        name,
        store_file,
        store_password,
        declaration.key_alias,
        key_password,
    )
}

fn resolve_store_file(raw: &str, base_dir: Option<&Path>) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() {
        return PathBuf::new();
    }

    let path = PathBuf::from(raw);
    match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path,
    }
}

/// Reads a secret. An unset environment variable becomes an empty secret so
/// that release resolution reports it as missing material.
fn resolve_secret(identity: &str, field: &str, value: SecretValue) -> SecretString {
    match value {
        SecretValue::Literal(literal) => SecretString::from(literal),
        SecretValue::Env { env } => match std::env::var(&env) {
            Ok(secret) => SecretString::from(secret),
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' for {} of signing identity '{}' is not set",
                    env,
                    field,
                    identity
                );
                SecretString::from(String::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SdkBounds;
    use secrecy::ExposeSecret;

    const WASHER: &str = r#"
project:
  namespace: com.fxck.washer.washer
  ndk_version: "27.0.12077973"
  sdk:
    min_sdk: 23
signing:
  release:
    store_file: keys/upload-keystore.jks
    store_password: store-secret
    key_alias: upload
    key_password:
      env: WASHER_KEY_PASSWORD
variants:
  debug:
    abi_filters:
      - arm64-v8a
      - x86_64
  release:
    minify_enabled: true
    signing: release
    proguard_files:
      - default: proguard-android-optimize.txt
      - proguard-rules.pro
"#;

    #[test]
    fn test_parse_project_defaults() {
        let yaml = "project:\n  namespace: com.example.app\n";
        let declarations = parse_declarations(yaml, None).unwrap();

        assert_eq!(declarations.project.version_code, 1);
        assert_eq!(declarations.project.version_name, "1.0.0");
        assert_eq!(declarations.project.jvm_target, 17);
        assert_eq!(declarations.project.sdk, SdkBounds::default());
        assert_eq!(declarations.variants.len(), 3);
        assert!(declarations.signing.is_empty());
    }

    #[test]
    fn test_parse_full_document() {
        temp_env::with_var("WASHER_KEY_PASSWORD", Some("key-secret"), || {
            let declarations = parse_declarations(WASHER, Some(Path::new("/work/app"))).unwrap();

            assert_eq!(declarations.project.sdk, SdkBounds::new(23, 35, 35));
            assert_eq!(declarations.project.ndk_version.as_deref(), Some("27.0.12077973"));

            let release = declarations.variant(VariantKind::Release).unwrap();
            assert!(release.minify_enabled);
            assert_eq!(release.signing.as_deref(), Some("release"));
            assert_eq!(release.proguard_files.len(), 2);
            assert!(release.abi_filter.is_all());

            let debug = declarations.variant(VariantKind::Debug).unwrap();
            assert_eq!(debug.abi_filter.abis(), vec![Abi::Arm64V8a, Abi::X86_64]);
            assert!(debug.debuggable);

            let identity = declarations.signing_identity("release").unwrap();
            assert_eq!(
                identity.store_file(),
                Path::new("/work/app/keys/upload-keystore.jks")
            );
            assert_eq!(identity.key_alias(), "upload");
            assert_eq!(identity.store_password().expose_secret(), "store-secret");
            assert_eq!(identity.key_password().expose_secret(), "key-secret");
        });
    }

    #[test]
    fn test_unset_env_secret_becomes_empty() {
        temp_env::with_var_unset("WASHER_KEY_PASSWORD", || {
            let declarations = parse_declarations(WASHER, None).unwrap();
            let identity = declarations.signing_identity("release").unwrap();
            assert_eq!(identity.missing_fields(), vec!["key_password"]);
        });
    }

    #[test]
    fn test_absolute_store_file_kept() {
        let yaml = r#"
project:
  namespace: com.example.app
signing:
  upload:
    store_file: /secure/upload.jks
"#;
        let declarations = parse_declarations(yaml, Some(Path::new("/work"))).unwrap();
        let identity = declarations.signing_identity("upload").unwrap();
        assert_eq!(identity.store_file(), Path::new("/secure/upload.jks"));
        assert_eq!(
            identity.missing_fields(),
            vec!["store_password", "key_alias", "key_password"]
        );
    }

    #[test]
    fn test_empty_abi_filters_means_all() {
        let yaml = r#"
project:
  namespace: com.example.app
variants:
  release:
    abi_filters: []
"#;
        let declarations = parse_declarations(yaml, None).unwrap();
        let release = declarations.variant(VariantKind::Release).unwrap();
        assert_eq!(release.abi_filter, ArchitectureFilter::All);
    }

    #[test]
    fn test_unknown_abi_rejected() {
        let yaml = r#"
project:
  namespace: com.example.app
variants:
  release:
    abi_filters: [mips]
"#;
        let result = parse_declarations(yaml, None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unsupported_variant_rejected() {
        let yaml = r#"
project:
  namespace: com.example.app
variants:
  staging:
    minify_enabled: true
"#;
        let err = parse_declarations(yaml, None).unwrap_err();
        assert!(err.to_string().contains("Unsupported variant 'staging'"));
    }

    #[test]
    fn test_invalid_sdk_bounds_fail_at_load() {
        let yaml = r#"
project:
  namespace: com.example.app
  sdk:
    min_sdk: 30
    target_sdk: 28
"#;
        let err = parse_declarations(yaml, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSdkBounds { min: 30, target: 28, .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_declarations("project: [", None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_auto_detects_yaml() {
        let (_, format) =
            parse_declarations_auto("project:\n  namespace: com.example.app\n", None).unwrap();
        assert_eq!(format, ConfigFormat::Yaml);
    }

    #[test]
    fn test_load_declarations_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipwright.yaml");
        std::fs::write(
            &path,
            "project:\n  namespace: com.example.app\nsigning:\n  release:\n    store_file: upload.jks\n",
        )
        .unwrap();

        let declarations = load_declarations(&path).unwrap();
        let identity = declarations.signing_identity("release").unwrap();
        assert_eq!(identity.store_file(), dir.path().join("upload.jks"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load_declarations(Path::new("/nonexistent/shipwright.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_secret_value_debug_is_redacted() {
        let rendered = format!("{:?}", SecretValue::Literal("hunter2".to_string()));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_misspelled_variant_key_rejected() {
        let yaml = r#"
project:
  namespace: com.example.app
variants:
  release:
    abi_filter: [arm64-v8a]
"#;
        let err = parse_declarations(yaml, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("abi_filter"));
    }

    #[test]
    fn test_camel_case_minify_key_rejected() {
        let yaml = r#"
project:
  namespace: com.example.app
variants:
  release:
    minifyEnabled: true
"#;
        let err = parse_declarations(yaml, None).unwrap_err();
        assert!(err.to_string().contains("minifyEnabled"));
    }

    #[test]
    fn test_unknown_signing_key_rejected() {
        let yaml = r#"
project:
  namespace: com.example.app
signing:
  release:
    store_file: upload.jks
    keyAlias: upload
"#;
        let err = parse_declarations(yaml, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("keyAlias"));
    }

    #[test]
    fn test_unknown_project_and_sdk_keys_rejected() {
        let top_level = "project:\n  namespace: com.example.app\nvariant:\n  release: {}\n";
        assert!(matches!(
            parse_declarations(top_level, None),
            Err(ConfigError::Parse(_))
        ));

        let sdk = "project:\n  namespace: com.example.app\n  sdk:\n    min_sdk_version: 24\n";
        assert!(matches!(parse_declarations(sdk, None), Err(ConfigError::Parse(_))));

        let variant_sdk = r#"
project:
  namespace: com.example.app
variants:
  debug:
    sdk:
      minSdk: 24
"#;
        assert!(matches!(
            parse_declarations(variant_sdk, None),
            Err(ConfigError::Parse(_))
        ));
    }

    // ========== HUML Parsing Tests ==========

    const WASHER_HUML: &str = "%HUML v0.2.0
project::
  namespace: \"com.fxck.washer.washer\"
  ndk_version: \"27.0.12077973\"
  sdk::
    min_sdk: 23
signing::
  release::
    store_file: \"keys/upload-keystore.jks\"
    store_password: \"store-secret\"
    key_alias: \"upload\"
    key_password::
      env: \"WASHER_HUML_KEY_PASSWORD\"
variants::
  debug::
    abi_filters:: \"arm64-v8a\", \"x86_64\"
  release::
    minify_enabled: true
    signing: \"release\"
    proguard_files::
      - ::
        default: \"proguard-android-optimize.txt\"
      - \"proguard-rules.pro\"
";

    #[test]
    fn test_parse_huml_document() {
        temp_env::with_var("WASHER_HUML_KEY_PASSWORD", Some("huml-key-secret"), || {
            let declarations =
                parse_declarations_huml(WASHER_HUML, Some(Path::new("/work/app"))).unwrap();

            assert_eq!(declarations.project.sdk, SdkBounds::new(23, 35, 35));

            let debug = declarations.variant(VariantKind::Debug).unwrap();
            assert_eq!(debug.abi_filter.abis(), vec![Abi::Arm64V8a, Abi::X86_64]);

            let release = declarations.variant(VariantKind::Release).unwrap();
            assert!(release.minify_enabled);
            assert!(release.abi_filter.is_all());
            assert_eq!(
                release.proguard_files,
                vec![
                    ShrinkRule::Toolchain {
                        default: "proguard-android-optimize.txt".to_string()
                    },
                    ShrinkRule::File(PathBuf::from("proguard-rules.pro")),
                ]
            );

            let identity = declarations.signing_identity("release").unwrap();
            assert_eq!(
                identity.store_file(),
                Path::new("/work/app/keys/upload-keystore.jks")
            );
            assert_eq!(identity.store_password().expose_secret(), "store-secret");
            assert_eq!(identity.key_password().expose_secret(), "huml-key-secret");
        });
    }

    #[test]
    fn test_auto_detects_huml() {
        temp_env::with_var_unset("WASHER_HUML_KEY_PASSWORD", || {
            let (declarations, format) = parse_declarations_auto(WASHER_HUML, None).unwrap();

            assert_eq!(format, ConfigFormat::Huml);
            let identity = declarations.signing_identity("release").unwrap();
            assert_eq!(identity.missing_fields(), vec!["key_password"]);
        });
    }

    #[test]
    fn test_load_huml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shipwright.huml");
        let huml = "%HUML v0.2.0
project::
  namespace: \"com.example.app\"
signing::
  release::
    store_file: \"upload.jks\"
";
        std::fs::write(&path, huml).unwrap();

        let declarations = load_declarations(&path).unwrap();
        let identity = declarations.signing_identity("release").unwrap();
        assert_eq!(identity.store_file(), dir.path().join("upload.jks"));
    }

    #[test]
    fn test_parse_huml_unknown_key_rejected() {
        let huml = "%HUML v0.2.0
project::
  namespace: \"com.example.app\"
variants::
  release::
    minifyEnabled: true
";
        let result = parse_declarations_huml(huml, None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_parse_huml_invalid_syntax() {
        let huml = "%HUML v0.2.0
project::
  namespace invalid syntax here
";
        let err = parse_declarations_huml(huml, None).unwrap_err();
        assert!(err.to_string().contains("Invalid HUML"));
    }
}

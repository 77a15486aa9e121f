//! Flutter build invocation for a resolved variant.
//!
//! Translates a [`ResolvedConfig`] into `flutter build` arguments so the
//! CLI tool sees the same mode, ABI set and obfuscation settings as Gradle.

use crate::error::ConfigError;
use crate::models::{ArchitectureFilter, VariantKind};
use crate::resolver::ResolvedConfig;

/// Directory for Dart symbol maps when obfuscating.
pub const SPLIT_DEBUG_INFO_DIR: &str = "build/app/outputs/symbols";

/// Android package format produced by `flutter build`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlutterTarget {
    #[default]
    Apk,
    AppBundle,
}

impl FlutterTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlutterTarget::Apk => "apk",
            FlutterTarget::AppBundle => "appbundle",
        }
    }
}

impl std::str::FromStr for FlutterTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "apk" => Ok(FlutterTarget::Apk),
            "appbundle" | "aab" => Ok(FlutterTarget::AppBundle),
            _ => Err(ConfigError::Validation(format!(
                "Unknown flutter build target: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for FlutterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the `flutter` arguments (without the `flutter` program itself).
///
/// `--target-platform` is omitted when the filter is `All`, which is how
/// Flutter builds every supported ABI.
pub fn flutter_build_args(resolved: &ResolvedConfig, target: FlutterTarget) -> Vec<String> {
    let mut args = vec![
        "build".to_string(),
        target.as_str().to_string(),
        format!("--{}", resolved.variant.as_str()),
        format!("--build-name={}", resolved.version_name),
        format!("--build-number={}", resolved.version_code),
    ];

    if let ArchitectureFilter::Only(abis) = &resolved.abi_filter {
        let platforms: Vec<_> = abis.iter().map(|abi| abi.flutter_platform()).collect();
        args.push(format!("--target-platform={}", platforms.join(",")));
    }

    // Dart obfuscation is only supported in release mode
    if resolved.variant == VariantKind::Release && resolved.minify_enabled {
        args.push("--obfuscate".to_string());
        args.push(format!("--split-debug-info={}", SPLIT_DEBUG_INFO_DIR));
    }

    args
}

/// Renders the full command line for display or scripts.
pub fn generate_build_command(resolved: &ResolvedConfig, target: FlutterTarget) -> String {
    let mut command = String::from("flutter");
    for arg in flutter_build_args(resolved, target) {
        command.push(' ');
        command.push_str(&arg);
    }
    command
}

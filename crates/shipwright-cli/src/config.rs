//! Declarations file discovery and loading.
//!
//! Priority order: `--config` flag > `SHIPWRIGHT_CONFIG` > files in the
//! working directory.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use shipwright_core::{VariantResolver, load_declarations};

/// Environment variable naming the declarations file.
pub const CONFIG_ENV: &str = "SHIPWRIGHT_CONFIG";

/// File names searched in the working directory, in order.
pub const DEFAULT_FILE_NAMES: [&str; 2] = ["shipwright.yaml", "shipwright.huml"];

/// Finds the declarations file to load.
pub fn resolve_config_path(flag: Option<&Path>, working_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    for name in DEFAULT_FILE_NAMES {
        let candidate = working_dir.join(name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    bail!(
        "No build declarations found in {}.\n\n\
         Create shipwright.yaml, pass --config <path>, or set {}.",
        working_dir.display(),
        CONFIG_ENV
    )
}

/// Loads declarations and builds a resolver.
pub fn load_resolver(path: &Path) -> Result<VariantResolver> {
    let declarations = load_declarations(path)
        .with_context(|| format!("Failed to load build declarations from {}", path.display()))?;
    let resolver = VariantResolver::new(declarations)
        .with_context(|| format!("Invalid build declarations in {}", path.display()))?;

    tracing::debug!("Using build declarations from {}", path.display());
    Ok(resolver)
}

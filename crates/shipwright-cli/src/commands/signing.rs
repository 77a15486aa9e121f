//! `shipwright key-properties` commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Subcommand;

use shipwright_core::VariantResolver;
use shipwright_core::signing::{cleanup_key_properties, read_keystore_type, write_key_properties};

#[derive(Subcommand)]
pub enum KeyPropertiesCommands {
    /// Write android/key.properties for a variant's signing identity
    Write {
        /// Variant name (usually release)
        #[arg(default_value = "release")]
        variant: String,

        /// Flutter project root
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },

    /// Remove android/key.properties
    Clean {
        /// Flutter project root
        #[arg(long, default_value = ".")]
        project: PathBuf,
    },
}

pub fn handle_key_properties_command(
    resolver: &VariantResolver,
    cmd: KeyPropertiesCommands,
) -> Result<()> {
    match cmd {
        KeyPropertiesCommands::Write { variant, project } => {
            write_for_variant(resolver, &variant, &project)
        }
        KeyPropertiesCommands::Clean { project } => clean_key_properties(&project),
    }
}

fn write_for_variant(resolver: &VariantResolver, variant: &str, project: &Path) -> Result<()> {
    let resolved = resolver
        .resolve(variant, &[])
        .with_context(|| format!("Failed to resolve variant '{}'", variant))?;

    let Some(handle) = resolved.signing.handle() else {
        bail!(
            "Variant '{}' is signed with the debug key; no key.properties needed",
            variant
        );
    };

    let keystore_type = read_keystore_type(handle)?;
    let path = write_key_properties(project, handle)?;

    println!("Wrote {}", path.display());
    println!("Identity:      {}", handle.name());
    println!("Keystore type: {}", keystore_type);
    Ok(())
}

pub fn clean_key_properties(project: &Path) -> Result<()> {
    if cleanup_key_properties(project)? {
        println!("Removed {}", project.join("android/key.properties").display());
    } else {
        println!("No key.properties to remove.");
    }
    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::{
    resolve::{FlutterArgsOptions, ResolveOptions, handle_flutter_args, handle_resolve},
    signing::{KeyPropertiesCommands, handle_key_properties_command},
    variants::{handle_check, handle_variants},
};

#[derive(Parser)]
#[command(name = "shipwright")]
#[command(about = "Resolve Android build variants and release signing", long_about = None)]
#[command(version = shipwright_core::VERSION)]
struct Cli {
    /// Build declarations file (overrides SHIPWRIGHT_CONFIG)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a variant and print its configuration
    Resolve(ResolveOptions),

    /// List declared variants
    Variants,

    /// Validate declarations and resolve every variant
    Check,

    /// Print the flutter build command for a variant
    FlutterArgs(FlutterArgsOptions),

    /// Manage the Gradle key.properties file
    #[command(subcommand)]
    KeyProperties(KeyPropertiesCommands),
}

fn main() -> Result<()> {
    // Load .env file if present (doesn't override existing env vars)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shipwright_cli=info,shipwright_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // key-properties clean only touches the project directory
    if let Commands::KeyProperties(KeyPropertiesCommands::Clean { project }) = &cli.command {
        return commands::signing::clean_key_properties(project);
    }

    let working_dir = std::env::current_dir().context("Failed to read working directory")?;
    let path = config::resolve_config_path(cli.config.as_deref(), &working_dir)?;
    let resolver = config::load_resolver(&path)?;

    match cli.command {
        Commands::Resolve(options) => handle_resolve(&resolver, options)?,
        Commands::Variants => handle_variants(&resolver)?,
        Commands::Check => handle_check(&resolver)?,
        Commands::FlutterArgs(options) => handle_flutter_args(&resolver, options)?,
        Commands::KeyProperties(cmd) => handle_key_properties_command(&resolver, cmd)?,
    }

    Ok(())
}

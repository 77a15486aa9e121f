//! `shipwright resolve` and `shipwright flutter-args`.

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use shipwright_core::flutter::{FlutterTarget, generate_build_command};
use shipwright_core::signing::mask_secret;
use shipwright_core::{ResolvedConfig, SigningMode, VariantResolver};

#[derive(Args)]
pub struct ResolveOptions {
    /// Variant name (debug, profile, release)
    pub variant: String,

    /// Restrict the build to these ABIs (repeatable)
    #[arg(long = "abi")]
    pub abis: Vec<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct FlutterArgsOptions {
    /// Variant name (debug, profile, release)
    pub variant: String,

    /// Restrict the build to these ABIs (repeatable)
    #[arg(long = "abi")]
    pub abis: Vec<String>,

    /// Package format: apk or appbundle
    #[arg(long, default_value = "apk")]
    pub target: String,
}

pub fn handle_resolve(resolver: &VariantResolver, options: ResolveOptions) -> Result<()> {
    let resolved = resolver
        .resolve_named(&options.variant, &options.abis)
        .with_context(|| format!("Failed to resolve variant '{}'", options.variant))?;

    if options.json {
        let json = serde_json::to_string_pretty(&resolved).context("Failed to serialize")?;
        println!("{}", json);
    } else {
        print_resolved(&resolved);
    }

    Ok(())
}

pub fn handle_flutter_args(resolver: &VariantResolver, options: FlutterArgsOptions) -> Result<()> {
    let target: FlutterTarget = options.target.parse()?;
    let resolved = resolver
        .resolve_named(&options.variant, &options.abis)
        .with_context(|| format!("Failed to resolve variant '{}'", options.variant))?;

    println!("{}", generate_build_command(&resolved, target));
    Ok(())
}

fn print_resolved(resolved: &ResolvedConfig) {
    println!("Variant:          {}", style(resolved.variant).bold());
    println!("Application ID:   {}", resolved.application_id);
    println!("Namespace:        {}", resolved.namespace);
    println!(
        "Version:          {} ({})",
        resolved.version_name, resolved.version_code
    );
    println!(
        "SDK:              min {} / target {} / compile {}",
        resolved.sdk.min_sdk, resolved.sdk.target_sdk, resolved.sdk.compile_sdk
    );
    if let Some(ndk) = &resolved.ndk_version {
        println!("NDK:              {}", ndk);
    }
    println!("JVM target:       {}", resolved.jvm_target);
    println!("Debuggable:       {}", resolved.debuggable);
    println!("Minify:           {}", resolved.minify_enabled);
    println!("Shrink resources: {}", resolved.shrink_resources);
    if !resolved.proguard_files.is_empty() {
        println!("ProGuard files:");
        for rule in &resolved.proguard_files {
            println!("  - {}", rule);
        }
    }

    if resolved.abi_filter.is_all() {
        println!("ABIs:             all supported");
    } else {
        println!("ABIs:             {}", resolved.abi_filter);
    }

    match &resolved.signing {
        SigningMode::DebugKey => println!("Signing:          {}", style("debug key").yellow()),
        SigningMode::Identity(handle) => {
            println!("Signing:          identity '{}'", handle.name());
            println!("  Keystore:       {}", handle.store_file().display());
            println!("  Key alias:      {}", mask_secret(handle.key_alias()));
        }
    }
}

//! `shipwright variants` and `shipwright check`.

use anyhow::{Result, bail};
use console::style;

use shipwright_core::VariantResolver;

pub fn handle_variants(resolver: &VariantResolver) -> Result<()> {
    let declarations = resolver.declarations();

    println!("Declared variants:");
    for (kind, variant) in &declarations.variants {
        let signing = variant.signing.as_deref().unwrap_or("-");
        println!(
            "  {:<8} minify={:<5} abis={:<20} signing={}",
            kind.as_str(),
            variant.minify_enabled,
            variant.abi_filter.to_string(),
            signing
        );
    }

    Ok(())
}

/// Resolves every variant; fails if any of them fails.
pub fn handle_check(resolver: &VariantResolver) -> Result<()> {
    let mut failures = 0;

    for name in resolver.declarations().variant_names() {
        match resolver.resolve(&name, &[]) {
            Ok(resolved) => println!(
                "{} {:<8} signing={}",
                style("ok").green(),
                name,
                resolved.signing.as_str()
            ),
            Err(e) => {
                failures += 1;
                println!("{} {:<8} {}", style("error").red(), name, e);
            }
        }
    }

    if failures > 0 {
        bail!("{} variant(s) failed to resolve", failures);
    }

    println!();
    println!("Build declarations are valid!");
    Ok(())
}

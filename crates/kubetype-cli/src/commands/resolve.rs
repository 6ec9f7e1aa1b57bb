//! Resolve command - show which registered type a manifest header maps to

use console::style;
use kubetype_core::{KubetypeError, ManifestConverter};

use crate::error::Result;

pub fn run(converter: &ManifestConverter, api_version: &str, kind: &str) -> Result<()> {
    let resolver = converter.resolver();
    let registry = resolver.kind_resolver().registry();
    let candidates = resolver.candidates(api_version, kind)?;

    println!(
        "{} Resolving {} ({})",
        style("→").blue(),
        style(kind).bold(),
        api_version
    );

    let mut resolved = None;
    for candidate in &candidates {
        if resolved.is_none() && registry.has_type(candidate) {
            println!("  {} {}", style("✓").green(), candidate);
            resolved = Some(candidate);
        } else {
            println!("  {} {}", style("·").dim(), style(candidate).dim());
        }
    }

    match resolved {
        Some(type_name) => {
            println!();
            println!("{}", style(type_name).green().bold());
            Ok(())
        }
        None => Err(KubetypeError::UnresolvableType {
            kind: kind.to_string(),
            api_version: api_version.to_string(),
            candidates,
        }
        .into()),
    }
}

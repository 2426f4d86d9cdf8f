//! `storefront extensions`

use colored::Colorize;
use serde::Serialize;

use crate::context::ProjectContext;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct ExtensionRow<'a> {
    package: &'a str,
    enabled: bool,
    namespace: Option<String>,
    short_name: String,
}

/// Run the extensions command
pub fn run_extensions(ctx: &ProjectContext, json: bool) -> Result<()> {
    let registry = ctx.config.registry();
    let mut rows = Vec::with_capacity(registry.len());
    for entry in registry.entries() {
        let name = entry.name()?;
        rows.push(ExtensionRow {
            package: entry.package(),
            enabled: entry.is_enabled(),
            namespace: name.namespace().map(str::to_string),
            short_name: name.short_name().to_string(),
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No extensions configured in {}", ctx.root.as_str().cyan());
        return Ok(());
    }

    println!("{}", "Extensions (lowest precedence first)".bold());
    for (i, row) in rows.iter().enumerate() {
        let state = if row.enabled {
            "enabled".green()
        } else {
            "disabled".yellow()
        };
        let namespace = row.namespace.as_deref().unwrap_or("-");
        println!(
            "  {}. {:<32} {:<10} namespace: {:<12} short name: {}",
            i + 1,
            row.package,
            state,
            namespace,
            row.short_name
        );
    }
    Ok(())
}

//! `storefront candidates`, `storefront resolve` and `storefront rewrite`

use std::path::Path;

use colored::Colorize;
use storefront_resolver::{
    CompilationContext, ImportRequest, ImportTransform, OverrideResolver, ResolverOptions,
    WILDCARD_PREFIX,
};

use crate::context::ProjectContext;
use crate::error::{CliError, Result};

fn resolver(ctx: &ProjectContext) -> Result<OverrideResolver> {
    let options = ResolverOptions::for_project(&ctx.root, &ctx.config)?;
    Ok(OverrideResolver::new(ctx.config.registry(), options))
}

fn not_wildcard(specifier: &str) -> CliError {
    CliError::user(format!(
        "'{specifier}' is not a wildcard import (expected a '{WILDCARD_PREFIX}' prefix)"
    ))
}

/// Run the candidates command
pub fn run_candidates(ctx: &ProjectContext, specifier: &str, from: &Path) -> Result<()> {
    let resolver = resolver(ctx)?;
    let request = ImportRequest::new(specifier, ctx.path_arg(from));
    let plan = resolver
        .candidates(&request)
        .ok_or_else(|| not_wildcard(specifier))?;

    tracing::debug!(source = ?plan.source, self_reference = plan.self_reference, "Candidate plan");
    if plan.candidates.is_empty() {
        println!("{}", "no candidates".yellow());
        return Ok(());
    }
    for (i, candidate) in plan.candidates.iter().enumerate() {
        println!("{}. {}", i + 1, candidate);
    }
    Ok(())
}

/// Run the resolve command
pub fn run_resolve(ctx: &ProjectContext, specifier: &str, from: &Path) -> Result<()> {
    let resolver = resolver(ctx)?;
    let request = ImportRequest::new(specifier, ctx.path_arg(from));
    let resolved = resolver
        .resolve(&request)?
        .ok_or_else(|| not_wildcard(specifier))?;
    println!("{resolved}");
    Ok(())
}

/// Run the rewrite command
pub fn run_rewrite(ctx: &ProjectContext, file: &Path) -> Result<()> {
    let resolver = resolver(ctx)?;
    let transform = ImportTransform::new(&resolver);
    let path = ctx.path_arg(file);
    let source = std::fs::read_to_string(path.to_native())
        .map_err(|e| CliError::user(format!("cannot read {path}: {e}")))?;

    let mut compilation = CompilationContext::new();
    let output = transform.rewrite_source(&mut compilation, &path, &source)?;
    compilation.finish();
    print!("{output}");
    Ok(())
}

//! Storefront CLI
//!
//! Inspects extension configuration, explains wildcard-import overrides and
//! normalizes SSR query strings for a storefront project.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::ProjectContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = storefront_runtime::logging::init(cli.verbose) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }

    let Some(command) = cli.command else {
        println!("{} extension toolkit", "storefront".green().bold());
        println!();
        println!("Run {} for available commands.", "storefront --help".cyan());
        return Ok(());
    };

    let cwd = context::current_dir()?;
    let ctx = ProjectContext::load(cli.project.as_deref(), cli.config_dir.as_deref(), &cwd)?;
    execute_command(&ctx, command)
}

fn execute_command(ctx: &ProjectContext, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Extensions { json } => commands::run_extensions(ctx, json),
        Commands::Candidates { specifier, from } => {
            commands::run_candidates(ctx, &specifier, &from)
        }
        Commands::Resolve { specifier, from } => commands::run_resolve(ctx, &specifier, &from),
        Commands::Rewrite { file } => commands::run_rewrite(ctx, &file),
        Commands::Query { query, strip } => commands::run_query(ctx, &query, &strip),
    }
}

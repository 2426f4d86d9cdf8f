//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Storefront - inspect extension overrides and request normalization
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root (defaults to the nearest directory with a storefront config)
    #[arg(long, global = true, env = "STOREFRONT_PROJECT")]
    pub project: Option<PathBuf>,

    /// Directory holding the user-wide config.toml
    #[arg(long, global = true, env = "STOREFRONT_CONFIG_DIR", hide = true)]
    pub config_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List configured extensions in declared order
    Extensions {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show where a wildcard import would be looked up, highest precedence first
    ///
    /// Examples:
    ///   storefront candidates '*/app/routes' --from app/main.jsx
    Candidates {
        /// Import specifier, e.g. '*/app/components/header'
        specifier: String,

        /// File containing the import, relative to the project root
        #[arg(long)]
        from: PathBuf,
    },

    /// Resolve a wildcard import to the file that wins
    Resolve {
        /// Import specifier, e.g. '*/app/components/header'
        specifier: String,

        /// File containing the import, relative to the project root
        #[arg(long)]
        from: PathBuf,
    },

    /// Print a module with its wildcard imports rewritten
    Rewrite {
        /// Module to rewrite, relative to the project root
        file: PathBuf,
    },

    /// Normalize a query string the way SSR requests are normalized
    Query {
        /// Query string, with or without the leading '?'
        query: String,

        /// Extra parameter keys to strip (added to [ssr] strip_parameters)
        #[arg(long = "strip")]
        strip: Vec<String>,
    },
}

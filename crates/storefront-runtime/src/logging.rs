//! Tracing subscriber setup shared by storefront binaries.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` for verbose runs
/// and `warn` for everything else.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_level = if verbose { "debug" } else { "warn" };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    let filter_layer =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!("Verbose mode enabled");
    Ok(())
}

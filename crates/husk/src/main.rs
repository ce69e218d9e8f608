//! Husk CLI entry point.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use husk::cli::Cli;

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments first; --debug picks the default log level
    let cli = Cli::parse();
    let directive = if cli.debug { "husk=debug" } else { "husk=info" };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    // Execute command
    cli.execute()
}

//! Playlint - A rule-driven playbook linter
//!
//! This is the main entry point for the Playlint CLI.

mod cli;

use anyhow::{Context, Result};
use cli::output::Reporter;
use cli::Cli;
use playlint::config::load_config;
use playlint::lint::Linter;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
    let loaded = load_config(cli.config.as_deref(), &cwd).context("Failed to load configuration")?;
    if let Some(source) = &loaded.source {
        debug!(path = %source.display(), "using configuration file");
    }

    let mut config = loaded.config;
    cli.apply_to(&mut config);
    let warnings_as_errors = config.warnings_as_errors;

    let linter = Linter::new(config).context("Invalid lint configuration")?;
    let reporter = Reporter::new(!cli.no_color, cli.format);

    if cli.list_rules {
        print!("{}", reporter.render_rules(linter.rules())?);
        return Ok(());
    }

    let result = linter.lint_paths(&cli.paths);
    print!("{}", reporter.render(&result)?);

    std::process::exit(result.exit_code(warnings_as_errors));
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}

//! Order audit command line entry point

use anyhow::{Context, Result};
use audit_config::{AuditConfig, LoggingConfig};
use clap::Parser;
use order_audit::cli::{Cli, Command};
use order_audit::commands::{log_startup, run_convert, run_validate};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.command.config_path().map(|path| path.as_path());

    let config = AuditConfig::load(config_path).context("Failed to load configuration")?;

    // Loader events fire before the subscriber exists; log_startup restates them
    init_tracing(&config.logging);
    log_startup(config_path, &config);

    match &cli.command {
        Command::Validate(args) => {
            let mut stdout = std::io::stdout().lock();
            run_validate(args, &config, &mut stdout)?;
        }
        Command::Convert(args) => {
            run_convert(args, &config)?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the console summary
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let json_layer = logging
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!logging.json).then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

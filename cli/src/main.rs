use std::process::ExitCode;

use clap::Parser;
use conddb_cli::{Cli, CliConfig};

/// Exit code for configuration, connection and backend failures.
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match CliConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("conddb: {e:#}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    match conddb_cli::run(cli, &cfg, &mut stdout) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(EXIT_FAILURE)),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("conddb: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

//! Coffer - per-key versioned secrets on top of whole-blob versioning.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use coffer::cli::output;
use coffer::cli::{execute, Cli};
use coffer::core::constants::LOG_ENV;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("coffer=debug")
        } else {
            EnvFilter::new("coffer=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.config) {
        let suggestion = match &e {
            coffer::Error::SecretNotFound(_) => Some("check the service and key: coffer list <service>"),
            coffer::Error::Unsupported(_) => Some("not available on the configured backend"),
            coffer::Error::Config(coffer::error::ConfigError::FeatureDisabled(_)) => {
                Some("rebuild with: cargo install coffer --features aws")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

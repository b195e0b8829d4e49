//! Command-line interface.

pub mod output;
pub mod secrets;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::Config;
use crate::error::Result;

/// Coffer - per-key versioned secrets on top of whole-blob versioning.
#[derive(Parser)]
#[command(
    name = "coffer",
    about = "Per-key versioned secrets on top of whole-blob versioning backends",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (default: ./coffer.toml)
    #[arg(long, global = true, env = "COFFER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Set a secret, creating a new version of that key
    Write {
        /// Service (group of secrets)
        service: String,
        /// Secret key
        key: String,
        /// Secret value
        value: String,
    },

    /// Read a secret
    Read {
        service: String,
        key: String,
        /// Per-key version to read (default: latest)
        #[arg(long)]
        version: Option<u32>,
        /// Print only the value
        #[arg(short, long)]
        quiet: bool,
        /// Output as JSON
        #[arg(long, conflicts_with = "quiet")]
        json: bool,
    },

    /// Delete a secret from its service
    Delete { service: String, key: String },

    /// List secrets in a service
    List {
        service: String,
        /// Include current values
        #[arg(long)]
        values: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export all key/value pairs of a service as JSON
    Export { service: String },

    /// Show the change history of a secret
    History {
        service: String,
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute a command.
pub fn execute(command: Command, config_path: Option<PathBuf>) -> Result<()> {
    use Command::*;

    let config = Config::load(config_path.as_deref())?;
    let store = config.open_store()?;

    match command {
        Write {
            service,
            key,
            value,
        } => secrets::write(&store, &service, &key, &value),
        Read {
            service,
            key,
            version,
            quiet,
            json,
        } => secrets::read(&store, &service, &key, version, quiet, json),
        Delete { service, key } => secrets::delete(&store, &service, &key),
        List {
            service,
            values,
            json,
        } => secrets::list(&store, &service, values, json),
        Export { service } => secrets::export(&store, &service),
        History { service, key, json } => secrets::history(&store, &service, &key, json),
    }
}

//! CLI command implementations.

pub mod config;
pub mod format;
pub mod resolve;
pub mod simulate;

use clap::{Args, Subcommand};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Product JSON file, as embedded in the product page.
    pub product: String,

    /// Option values in option order (repeatable). Omitted options keep
    /// the initial variant's values.
    #[arg(short, long = "option")]
    pub options: Vec<String>,
}

/// Arguments for the format command.
#[derive(Args)]
pub struct FormatArgs {
    /// Amount in minor units (cents). Decimals are rounded.
    pub amount: String,

    /// Currency code (default: from config).
    #[arg(long)]
    pub currency: Option<String>,

    /// Locale (default: from config).
    #[arg(long)]
    pub locale: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Session script (TOML).
    pub script: String,

    /// Stop at the first failing step.
    #[arg(long)]
    pub fail_fast: bool,
}

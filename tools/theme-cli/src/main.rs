//! Theme CLI - Command line tool for the storefront theme script layer.
//!
//! Commands:
//! - `theme resolve` - Resolve an option selection against product JSON
//! - `theme format` - Format an amount as the storefront would
//! - `theme config` - Manage configuration
//! - `theme simulate` - Run a scripted cart session

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, FormatArgs, ResolveArgs, SimulateArgs};

/// Theme CLI - Inspect and exercise storefront theme behavior
#[derive(Parser)]
#[command(name = "theme")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an option selection to a variant
    Resolve(ResolveArgs),

    /// Format an amount of money
    Format(FormatArgs),

    /// Manage configuration
    Config(ConfigArgs),

    /// Run a scripted cart session
    Simulate(SimulateArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &ctx).await,
        Commands::Format(args) => commands::format::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
        Commands::Simulate(args) => commands::simulate::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

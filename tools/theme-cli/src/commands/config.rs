//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};
use theme_core::generate_default_config;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    let config = &ctx.config;
    println!();
    println!("[cart]");
    ctx.output
        .kv("max_cart_quantity", &config.cart.max_cart_quantity.to_string());
    ctx.output
        .kv("max_item_quantity", &config.cart.max_item_quantity.to_string());
    ctx.output
        .kv("open_cart_on_add", &config.cart.open_cart_on_add.to_string());

    println!();
    println!("[money]");
    ctx.output.kv("currency", &config.money.currency);
    ctx.output.kv("locale", &config.money.locale);
    ctx.output
        .kv("sample", &config.money_format().format(123456_i64));

    println!();
    println!("[notifications]");
    ctx.output
        .kv("enabled", &config.notifications.enabled.to_string());
    ctx.output
        .kv("duration_ms", &config.notifications.duration_ms.to_string());
    ctx.output
        .kv("announce", &config.notifications.announce.to_string());

    println!();
    println!("[network]");
    ctx.output
        .kv("timeout_ms", &config.network.timeout_ms.to_string());

    println!();
    println!("[logging]");
    ctx.output.kv("level", &config.logging.level);
    ctx.output.kv("format", &config.logging.format);

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    if ctx.config_path.is_none() {
        ctx.output.warn(&format!(
            "No config file found ({}); checking defaults",
            CONFIG_NAMES.join(", ")
        ));
    }

    ctx.config.validate()?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "valid": true }));
    } else {
        ctx.output.success("Configuration is valid");
    }
    Ok(())
}

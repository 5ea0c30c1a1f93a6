//! Money formatting command.

use anyhow::Result;
use theme_commerce::money::{IntoMinorUnits, MoneyFormat};

use super::FormatArgs;
use crate::context::Context;

/// Run the format command.
pub async fn run(args: FormatArgs, ctx: &Context) -> Result<()> {
    let currency = args
        .currency
        .as_deref()
        .unwrap_or(&ctx.config.money.currency);
    let locale = args.locale.as_deref().unwrap_or(&ctx.config.money.locale);

    if args.amount.as_str().into_minor_units().is_none() {
        ctx.output
            .warn(&format!("'{}' is not a number; formatting as zero", args.amount));
    }
    let formatted = MoneyFormat::new(currency, locale).format(args.amount.as_str());

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "amount": args.amount,
            "currency": currency,
            "locale": locale,
            "formatted": formatted,
        }));
    } else {
        println!("{}", formatted);
    }
    Ok(())
}

//! Variant resolution command.

use anyhow::{bail, Context as _, Result};
use theme_commerce::catalog::{resolve, ProductData, SelectionState};

use super::ResolveArgs;
use crate::context::Context;
use crate::output::availability_badge;

/// Run the resolve command.
pub async fn run(args: ResolveArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.product);
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    let product = ProductData::from_json(&json)
        .with_context(|| format!("Invalid product data: {}", path.display()))?;

    let mut selection = match product.initial_variant() {
        Some(variant) => SelectionState::from_variant(variant),
        None => bail!("Product {} has no variants", product.id),
    };
    for (i, value) in args.options.iter().enumerate() {
        selection.select(i + 1, value.as_str())?;
    }
    ctx.output
        .debug(&format!("Selection: {}", selection.values().join(" / ")));

    let format = ctx.config.money_format();
    let Some(variant) = resolve(&selection, &product.variants) else {
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({
                "selection": selection.values(),
                "variant": null,
            }));
            return Ok(());
        }
        bail!("No variant matches {}", selection.values().join(" / "));
    };

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "selection": selection.values(),
            "variant": variant,
            "price": format.format(variant.price_cents),
        }));
        return Ok(());
    }

    ctx.output.header(&product.title);
    ctx.output.kv("variant", variant.id.as_str());
    ctx.output.kv("options", &variant.options.join(" / "));
    ctx.output.kv("price", &format.format(variant.price_cents));
    if let Some(compare_at) = variant.compare_at_price_cents.filter(|_| variant.is_on_sale()) {
        ctx.output.kv("compare at", &format.format(compare_at));
    }
    ctx.output.kv("status", &availability_badge(variant.available));
    if let Some(image) = &variant.featured_image {
        ctx.output.kv("image", image);
    }
    Ok(())
}

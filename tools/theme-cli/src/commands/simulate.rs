//! Scripted cart sessions.
//!
//! A session script seeds the in-memory cart service, optionally sets
//! shopper preferences, then runs steps through the storefront exactly as
//! page events would.

use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use theme_client::{
    CatalogEntry, ClientError, LineProperties, MemoryCartClient, Sleeper, TimedCartClient,
};
use theme_commerce::cart::{CartSnapshot, LineItem};
use theme_commerce::error::ThemeError;
use theme_commerce::ids::{ItemKey, VariantId};
use theme_core::cart::EditOutcome;
use theme_core::{Storefront, ThemeConfig};
use theme_observability::{LogFormat, LogLevel, StructuredLogger};
use theme_prefs::{PreferenceStore, ThemePreferences};
use theme_view::MemoryCartSurface;

use super::SimulateArgs;
use crate::context::Context;
use crate::output::TerminalSink;

/// Timer backed by the tokio runtime.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

type SessionStorefront =
    Storefront<TimedCartClient<MemoryCartClient, TokioSleeper>, MemoryCartSurface>;

/// A session script.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    /// Variants the cart service will sell.
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    /// Lines rendered into the page before scripts run.
    #[serde(default)]
    pub cart: Vec<RenderedItem>,
    #[serde(default)]
    pub preferences: Option<SessionPreferences>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Unit price in minor units.
    pub price: i64,
    #[serde(default)]
    pub inventory: Option<i64>,
    #[serde(default = "default_true")]
    pub available: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderedItem {
    pub key: String,
    pub variant: String,
    pub quantity: i64,
    pub price: i64,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPreferences {
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub reduced_motion: Option<bool>,
    #[serde(default)]
    pub currency: Option<String>,
}

fn default_true() -> bool {
    true
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Add {
        variant: String,
        #[serde(default = "default_quantity")]
        quantity: i64,
    },
    Update {
        key: String,
        delta: i64,
    },
    Set {
        key: String,
        quantity: i64,
    },
    Remove {
        key: String,
    },
    /// Make the service's next call fail with an HTTP status.
    Fail {
        status: u16,
    },
    /// Make the service's next call fail to connect.
    Disconnect,
}

fn default_quantity() -> i64 {
    1
}

impl Step {
    fn describe(&self) -> String {
        match self {
            Self::Add { variant, quantity } => format!("add {} x{}", variant, quantity),
            Self::Update { key, delta } => format!("update {} by {:+}", key, delta),
            Self::Set { key, quantity } => format!("set {} to {}", key, quantity),
            Self::Remove { key } => format!("remove {}", key),
            Self::Fail { status } => format!("next call fails with {}", status),
            Self::Disconnect => "next call loses the connection".to_string(),
        }
    }
}

impl Session {
    pub fn parse(content: &str) -> Result<Self> {
        let session: Session = toml::from_str(content)?;
        let unknown = session.steps.iter().find_map(|step| match step {
            Step::Add { variant, .. }
                if !session.catalog.iter().any(|item| &item.id == variant) =>
            {
                Some(variant)
            }
            _ => None,
        });
        if let Some(variant) = unknown {
            bail!("Step adds variant {} which is not in the catalog", variant);
        }
        Ok(session)
    }

    fn client(&self, config: &ThemeConfig) -> MemoryCartClient {
        self.catalog.iter().fold(
            MemoryCartClient::new().with_currency(config.money.currency.clone()),
            |client, item| {
                let mut entry = CatalogEntry::new(item.id.as_str(), item.title.as_str(), item.price);
                if let Some(inventory) = item.inventory {
                    entry = entry.with_inventory(inventory);
                }
                if let Some(image) = &item.image {
                    entry = entry.with_image(image.as_str());
                }
                if !item.available {
                    entry = entry.unavailable();
                }
                client.with_variant(entry)
            },
        )
    }

    fn rendered(&self) -> CartSnapshot {
        CartSnapshot::new(
            self.cart
                .iter()
                .map(|line| {
                    LineItem::new(
                        line.key.as_str(),
                        line.variant.as_str(),
                        line.quantity,
                        line.price,
                        line.title.as_str(),
                    )
                })
                .collect(),
        )
    }

    fn preferences(&self) -> PreferenceStore {
        let store = PreferenceStore::in_memory();
        if let Some(prefs) = &self.preferences {
            let defaults = ThemePreferences::default();
            ThemePreferences {
                notifications_enabled: prefs
                    .notifications
                    .unwrap_or(defaults.notifications_enabled),
                reduced_motion: prefs.reduced_motion.unwrap_or(defaults.reduced_motion),
                currency: prefs.currency.clone(),
            }
            .save(&store);
        }
        store
    }
}

#[derive(Debug, Serialize)]
struct StepReport {
    step: String,
    ok: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct LineReport {
    key: String,
    title: String,
    quantity: i64,
    line_price: String,
}

#[derive(Debug, Serialize)]
struct SessionReport {
    steps: Vec<StepReport>,
    lines: Vec<LineReport>,
    item_count: i64,
    subtotal: String,
}

/// Run the simulate command.
pub async fn run(args: SimulateArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.script);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read session script: {}", path.display()))?;
    let session = Session::parse(&content)
        .with_context(|| format!("Invalid session script: {}", path.display()))?;

    ctx.config.validate()?;
    let storefront = build(&session, ctx);

    let start = storefront.start(session.rendered()).await?;
    ctx.output
        .info(&format!("Cart ready with {} item(s)", start.item_count));

    let total = session.steps.len();
    let mut steps = Vec::with_capacity(total);
    for (i, step) in session.steps.iter().enumerate() {
        ctx.output.step(i + 1, total, &step.describe());
        let result = perform(&storefront, step).await;
        storefront.pump_events();

        let report = match result {
            Ok(detail) => {
                ctx.output.debug(&detail);
                StepReport {
                    step: step.describe(),
                    ok: true,
                    detail,
                }
            }
            Err(err) => StepReport {
                step: step.describe(),
                ok: false,
                detail: format!("{} [{}]", err, err.code()),
            },
        };
        let failed = !report.ok;
        steps.push(report);
        if failed && args.fail_fast {
            bail!("Step {} failed: {}", i + 1, step.describe());
        }
    }

    let report = summarize(&storefront, steps);
    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Cart");
    if report.lines.is_empty() {
        ctx.output.info("(empty)");
    }
    let widths = [20, 28, 5, 12];
    for line in &report.lines {
        ctx.output.table_row(
            &[
                &line.key,
                &line.title,
                &line.quantity.to_string(),
                &line.line_price,
            ],
            &widths,
        );
    }
    ctx.output.kv("items", &report.item_count.to_string());
    ctx.output.kv("subtotal", &report.subtotal);

    let failures = report.steps.iter().filter(|s| !s.ok).count();
    if failures > 0 {
        ctx.output
            .warn(&format!("{} of {} step(s) failed", failures, total));
    }
    Ok(())
}

fn build(session: &Session, ctx: &Context) -> SessionStorefront {
    let level = if ctx.output.is_verbose() {
        LogLevel::Debug
    } else {
        ctx.config.log_level()
    };
    let logger = StructuredLogger::default()
        .with_min_level(level)
        .with_format(if ctx.output.is_json() {
            LogFormat::Json
        } else {
            ctx.config.log_format()
        });

    let client = TimedCartClient::new(session.client(&ctx.config), TokioSleeper)
        .with_timeout(ctx.config.timeout());

    Storefront::builder(ctx.config.clone(), client, MemoryCartSurface::new())
        .notifications(Rc::new(TerminalSink::new(ctx.output.clone())))
        .preferences(session.preferences())
        .logger(logger)
        .build()
}

async fn perform(storefront: &SessionStorefront, step: &Step) -> Result<String, ThemeError> {
    let edited = |outcome: EditOutcome| match outcome {
        EditOutcome::Applied => "applied".to_string(),
        EditOutcome::Superseded => "superseded".to_string(),
    };
    match step {
        Step::Add { variant, quantity } => storefront
            .add_to_cart(
                VariantId::from(variant.as_str()),
                *quantity,
                LineProperties::new(),
            )
            .await
            .map(|aggregate| format!("cart has {} item(s)", aggregate.item_count)),
        Step::Update { key, delta } => storefront
            .update_quantity(&ItemKey::from(key.as_str()), *delta)
            .await
            .map(edited),
        Step::Set { key, quantity } => storefront
            .set_quantity(&ItemKey::from(key.as_str()), *quantity)
            .await
            .map(edited),
        Step::Remove { key } => storefront
            .remove_item(&ItemKey::from(key.as_str()))
            .await
            .map(edited),
        Step::Fail { status } => {
            storefront
                .client()
                .inner()
                .fail_next(ClientError::http(*status, "/cart"));
            Ok(format!("queued {} failure", status))
        }
        Step::Disconnect => {
            storefront
                .client()
                .inner()
                .fail_next(ClientError::Connection("connection reset".to_string()));
            Ok("queued connection failure".to_string())
        }
    }
}

fn summarize(storefront: &SessionStorefront, steps: Vec<StepReport>) -> SessionReport {
    let cart = storefront.cart();
    let surface = cart.surface();
    let lines = surface
        .keys_in_order()
        .iter()
        .filter_map(|key| surface.line(key))
        .map(|node| LineReport {
            key: node.key.to_string(),
            title: node.title.clone(),
            quantity: node.quantity,
            line_price: node.line_price.clone(),
        })
        .collect();
    SessionReport {
        steps,
        lines,
        item_count: surface.item_count(),
        subtotal: surface.subtotal().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_session() {
        let session = Session::parse(include_str!("../../sessions/checkout.toml")).unwrap();
        assert_eq!(session.catalog.len(), 2);
        assert_eq!(session.cart.len(), 1);
        assert_eq!(
            session.steps[0],
            Step::Add {
                variant: "12".into(),
                quantity: 2,
            }
        );
        assert!(session.steps.contains(&Step::Fail { status: 503 }));
    }

    #[test]
    fn test_add_defaults_to_one() {
        let session = Session::parse(
            r#"
            [[catalog]]
            id = "1"
            title = "Mug"
            price = 1200

            [[steps]]
            action = "add"
            variant = "1"
            "#,
        )
        .unwrap();
        assert_eq!(
            session.steps,
            vec![Step::Add {
                variant: "1".into(),
                quantity: 1,
            }]
        );
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let err = Session::parse(
            r#"
            [[steps]]
            action = "add"
            variant = "99"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not in the catalog"));
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(Session::parse("[[steps]]\naction = \"teleport\"\n").is_err());
    }

    #[test]
    fn test_preferences_are_stored() {
        let session = Session::parse(
            r#"
            [preferences]
            reduced_motion = true
            currency = "EUR"
            "#,
        )
        .unwrap();
        let prefs = ThemePreferences::load(&session.preferences());
        assert!(prefs.reduced_motion);
        assert!(prefs.notifications_enabled);
        assert_eq!(prefs.currency.as_deref(), Some("EUR"));
    }
}

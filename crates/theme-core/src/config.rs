//! Theme configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use theme_client::TimeoutConfig;
use theme_commerce::cart::{QuantityLimits, DEFAULT_MAX_CART_QUANTITY, DEFAULT_MAX_ITEM_QUANTITY};
use theme_commerce::money::MoneyFormat;
use theme_observability::{LogFormat, LogLevel, NotifierOptions};

/// Theme configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default)]
    pub cart: CartConfig,

    #[serde(default)]
    pub money: MoneyConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ThemeConfig {
    /// Load config from a file. `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file, in the format its extension implies.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = self.render(is_json(path))?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Serialize as JSON or TOML.
    pub fn render(&self, json: bool) -> Result<String> {
        Ok(if json {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        })
    }

    /// Reject settings the theme cannot run with. Every problem is listed.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.cart.max_cart_quantity <= 0 {
            problems.push("cart.max_cart_quantity must be positive".to_string());
        }
        if self.cart.max_item_quantity <= 0 {
            problems.push("cart.max_item_quantity must be positive".to_string());
        }
        if self.cart.max_item_quantity > self.cart.max_cart_quantity {
            problems.push(format!(
                "cart.max_item_quantity ({}) exceeds cart.max_cart_quantity ({})",
                self.cart.max_item_quantity, self.cart.max_cart_quantity
            ));
        }
        if self.money.currency.trim().is_empty() {
            problems.push("money.currency must not be empty".to_string());
        }
        if self.network.timeout_ms == 0 {
            problems.push("network.timeout_ms must be positive".to_string());
        }
        if let Err(e) = self.logging.level.parse::<LogLevel>() {
            problems.push(format!("logging.level: {}", e));
        }
        if let Err(e) = self.logging.format.parse::<LogFormat>() {
            problems.push(format!("logging.format: {}", e));
        }

        if !problems.is_empty() {
            bail!("Invalid theme config:\n  - {}", problems.join("\n  - "));
        }
        Ok(())
    }

    pub fn limits(&self) -> QuantityLimits {
        QuantityLimits::new(self.cart.max_cart_quantity, self.cart.max_item_quantity)
    }

    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat::new(&self.money.currency, &self.money.locale)
    }

    pub fn notifier_options(&self) -> NotifierOptions {
        NotifierOptions {
            enabled: self.notifications.enabled,
            announce: self.notifications.announce,
            duration: Duration::from_millis(self.notifications.duration_ms),
        }
    }

    pub fn timeout(&self) -> TimeoutConfig {
        TimeoutConfig::from_millis(self.network.timeout_ms)
    }

    /// Configured log level; `Info` when unparsable.
    pub fn log_level(&self) -> LogLevel {
        self.logging.level.parse().unwrap_or(LogLevel::Info)
    }

    /// Configured log format; JSON when unparsable.
    pub fn log_format(&self) -> LogFormat {
        self.logging.format.parse().unwrap_or_default()
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map(|ext| ext == "json").unwrap_or(false)
}

/// Cart behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Ceiling on the sum of quantities in the cart.
    #[serde(default = "default_max_cart_quantity")]
    pub max_cart_quantity: i64,

    /// Ceiling on one line's quantity.
    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: i64,

    /// Reveal the cart drawer after a successful add.
    #[serde(default = "default_true")]
    pub open_cart_on_add: bool,
}

fn default_max_cart_quantity() -> i64 {
    DEFAULT_MAX_CART_QUANTITY
}

fn default_max_item_quantity() -> i64 {
    DEFAULT_MAX_ITEM_QUANTITY
}

fn default_true() -> bool {
    true
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            max_cart_quantity: DEFAULT_MAX_CART_QUANTITY,
            max_item_quantity: DEFAULT_MAX_ITEM_QUANTITY,
            open_cart_on_add: true,
        }
    }
}

/// Price display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyConfig {
    /// Shop currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// BCP 47 locale tag.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl Default for MoneyConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            locale: default_locale(),
        }
    }
}

/// On-screen notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long a notification stays up.
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,

    /// Mirror notifications to the live region.
    #[serde(default = "default_true")]
    pub announce: bool,
}

fn default_duration_ms() -> u64 {
    5000
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: default_duration_ms(),
            announce: true,
        }
    }
}

/// Cart service calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-call timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    8000
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error.
    #[serde(default = "default_level")]
    pub level: String,

    /// json or human.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

/// Commented default config for `theme config init`.
pub fn generate_default_config() -> String {
    r#"# Storefront theme configuration

[cart]
# Ceiling on the sum of quantities in the cart
max_cart_quantity = 50
# Ceiling on one line's quantity
max_item_quantity = 10
# Reveal the cart drawer after a successful add
open_cart_on_add = true

[money]
currency = "USD"
locale = "en-US"

[notifications]
enabled = true
duration_ms = 5000
announce = true

[network]
timeout_ms = 8000

[logging]
# trace, debug, info, warn, error
level = "info"
# json, human
format = "json"
"#
    .to_string()
}

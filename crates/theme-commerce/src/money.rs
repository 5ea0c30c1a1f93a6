//! Currencies and the storefront price formatter.
//!
//! Amounts are integer minor units (cents). Formatting always divides by
//! 100 and prints two decimals: only two-decimal currencies are supported.

use serde::{Deserialize, Serialize};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    NZD,
    CHF,
    CNY,
    INR,
    MXN,
}

impl Currency {
    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::CAD => "CA$",
            Currency::AUD => "A$",
            Currency::NZD => "NZ$",
            Currency::CHF => "CHF",
            Currency::CNY => "CN\u{00a5}",
            Currency::INR => "\u{20b9}",
            Currency::MXN => "MX$",
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "CAD" => Some(Currency::CAD),
            "AUD" => Some(Currency::AUD),
            "NZD" => Some(Currency::NZD),
            "CHF" => Some(Currency::CHF),
            "CNY" => Some(Currency::CNY),
            "INR" => Some(Currency::INR),
            "MXN" => Some(Currency::MXN),
            _ => None,
        }
    }
}

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolPosition {
    /// `$25.00`
    Prefix,
    /// `€ 25,00`
    PrefixSpaced,
    /// `25,00 €`
    SuffixSpaced,
}

/// Number conventions of a display locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    grouping: &'static str,
    decimal: char,
    position: SymbolPosition,
}

impl Locale {
    /// Resolve a BCP 47 tag (e.g., "de-DE") to its number conventions.
    ///
    /// Only the language subtag is consulted. Unknown languages fall back
    /// to en-US conventions.
    pub fn parse(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (grouping, decimal, position) = match language.as_str() {
            "de" | "it" | "es" | "pt" => (".", ',', SymbolPosition::SuffixSpaced),
            "fr" => ("\u{202f}", ',', SymbolPosition::SuffixSpaced),
            "nl" => (".", ',', SymbolPosition::PrefixSpaced),
            _ => (",", '.', SymbolPosition::Prefix),
        };

        Self {
            grouping,
            decimal,
            position,
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::parse("en-US")
    }
}

/// Lenient conversion of raw input into minor units.
///
/// Anything that is not a finite number yields `None`, which the formatter
/// renders as zero.
pub trait IntoMinorUnits {
    fn into_minor_units(self) -> Option<i64>;
}

impl IntoMinorUnits for i64 {
    fn into_minor_units(self) -> Option<i64> {
        Some(self)
    }
}

impl IntoMinorUnits for i32 {
    fn into_minor_units(self) -> Option<i64> {
        Some(i64::from(self))
    }
}

impl IntoMinorUnits for u32 {
    fn into_minor_units(self) -> Option<i64> {
        Some(i64::from(self))
    }
}

impl IntoMinorUnits for u64 {
    fn into_minor_units(self) -> Option<i64> {
        i64::try_from(self).ok()
    }
}

impl IntoMinorUnits for f64 {
    fn into_minor_units(self) -> Option<i64> {
        if !self.is_finite() || self.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(self.round() as i64)
    }
}

impl IntoMinorUnits for &str {
    fn into_minor_units(self) -> Option<i64> {
        let trimmed = self.trim();
        trimmed
            .parse::<i64>()
            .ok()
            .or_else(|| trimmed.parse::<f64>().ok().and_then(f64::into_minor_units))
    }
}

impl IntoMinorUnits for &String {
    fn into_minor_units(self) -> Option<i64> {
        self.as_str().into_minor_units()
    }
}

impl<T: IntoMinorUnits> IntoMinorUnits for Option<T> {
    fn into_minor_units(self) -> Option<i64> {
        self.and_then(IntoMinorUnits::into_minor_units)
    }
}

/// A currency + locale pair, resolved once and reused for every price on
/// the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    symbol: String,
    known_currency: bool,
    locale: Locale,
}

impl MoneyFormat {
    /// Build a formatter. Unknown currency codes print the code itself.
    pub fn new(currency_code: &str, locale: &str) -> Self {
        let (symbol, known_currency) = match Currency::from_code(currency_code) {
            Some(currency) => (currency.symbol().to_string(), true),
            None => (currency_code.trim().to_uppercase(), false),
        };
        Self {
            symbol,
            known_currency,
            locale: Locale::parse(locale),
        }
    }

    /// Format raw input. Never fails; bad input renders as zero.
    pub fn format(&self, amount: impl IntoMinorUnits) -> String {
        self.format_minor(amount.into_minor_units().unwrap_or(0))
    }

    fn format_minor(&self, minor: i64) -> String {
        let abs = minor.unsigned_abs();
        let number = format!(
            "{}{}{:02}",
            group_digits(abs / 100, self.locale.grouping),
            self.locale.decimal,
            abs % 100
        );

        let position = match self.locale.position {
            SymbolPosition::Prefix if !self.known_currency => SymbolPosition::PrefixSpaced,
            other => other,
        };
        let body = match position {
            SymbolPosition::Prefix => format!("{}{}", self.symbol, number),
            SymbolPosition::PrefixSpaced => format!("{}\u{a0}{}", self.symbol, number),
            SymbolPosition::SuffixSpaced => format!("{}\u{a0}{}", number, self.symbol),
        };

        if minor < 0 {
            format!("-{}", body)
        } else {
            body
        }
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self::new("USD", "en-US")
    }
}

/// Format an amount in minor units for display.
///
/// ```
/// use theme_commerce::money::format_money;
/// assert_eq!(format_money(2500, "USD", "en-US"), "$25.00");
/// assert_eq!(format_money(f64::NAN, "USD", "en-US"), "$0.00");
/// ```
pub fn format_money(amount: impl IntoMinorUnits, currency_code: &str, locale: &str) -> String {
    MoneyFormat::new(currency_code, locale).format(amount)
}

fn group_digits(mut value: u64, separator: &str) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(separator)
}

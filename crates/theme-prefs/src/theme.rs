//! The shopper preferences the theme reads.

use serde::{Deserialize, Serialize};

use crate::store::PreferenceStore;

const NOTIFICATIONS_KEY: &str = "notifications";
const REDUCED_MOTION_KEY: &str = "reduced-motion";
const CURRENCY_KEY: &str = "currency";

/// Shopper preferences. Missing or unreadable entries take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreferences {
    /// Show on-screen notifications.
    pub notifications_enabled: bool,
    /// Skip transitions such as the line-removal animation.
    pub reduced_motion: bool,
    /// Display prices in this currency instead of the shop's.
    pub currency: Option<String>,
}

impl Default for ThemePreferences {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            reduced_motion: false,
            currency: None,
        }
    }
}

impl ThemePreferences {
    /// Read from the store. Never fails.
    pub fn load(store: &PreferenceStore) -> Self {
        let defaults = Self::default();
        Self {
            notifications_enabled: store
                .get_or(NOTIFICATIONS_KEY, defaults.notifications_enabled),
            reduced_motion: store.get_or(REDUCED_MOTION_KEY, defaults.reduced_motion),
            currency: store
                .get::<String>(CURRENCY_KEY)
                .filter(|code| !code.trim().is_empty()),
        }
    }

    /// Write to the store. Returns whether every entry was stored.
    pub fn save(&self, store: &PreferenceStore) -> bool {
        let notifications = store.set(NOTIFICATIONS_KEY, &self.notifications_enabled);
        let motion = store.set(REDUCED_MOTION_KEY, &self.reduced_motion);
        let currency = match &self.currency {
            Some(code) => store.set(CURRENCY_KEY, code),
            None => store.remove(CURRENCY_KEY),
        };
        notifications && motion && currency
    }

    /// Currency to format with: the override if set, else `shop_currency`.
    pub fn display_currency<'a>(&'a self, shop_currency: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(shop_currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnavailableBackend;
    use std::rc::Rc;

    #[test]
    fn test_defaults_when_empty() {
        let store = PreferenceStore::in_memory();
        assert_eq!(ThemePreferences::load(&store), ThemePreferences::default());
    }

    #[test]
    fn test_save_and_load() {
        let store = PreferenceStore::in_memory();
        let prefs = ThemePreferences {
            notifications_enabled: false,
            reduced_motion: true,
            currency: Some("EUR".into()),
        };
        assert!(prefs.save(&store));
        assert_eq!(ThemePreferences::load(&store), prefs);

        let cleared = ThemePreferences {
            currency: None,
            ..prefs
        };
        cleared.save(&store);
        assert_eq!(ThemePreferences::load(&store).currency, None);
    }

    #[test]
    fn test_broken_store_yields_defaults() {
        let store = PreferenceStore::new(Rc::new(UnavailableBackend), "theme");
        let prefs = ThemePreferences {
            reduced_motion: true,
            ..ThemePreferences::default()
        };
        assert!(!prefs.save(&store));
        assert_eq!(ThemePreferences::load(&store), ThemePreferences::default());
    }

    #[test]
    fn test_garbage_entry_falls_back() {
        let store = PreferenceStore::in_memory();
        store.set("reduced-motion", &"yes please");
        store.set("currency", &"  ");
        let prefs = ThemePreferences::load(&store);
        assert!(!prefs.reduced_motion);
        assert_eq!(prefs.currency, None);
    }

    #[test]
    fn test_display_currency() {
        let mut prefs = ThemePreferences::default();
        assert_eq!(prefs.display_currency("USD"), "USD");
        prefs.currency = Some("GBP".into());
        assert_eq!(prefs.display_currency("USD"), "GBP");
    }
}

//! Dependency tagging for semantic categorization.

use std::time::Duration;

/// Outbound dependencies of the storefront scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyTag {
    /// The cart service (add / change / remove).
    Cart,
    /// Product recommendations.
    Recommendations,
    /// Analytics beacons.
    Analytics,
    /// Custom dependency with name.
    Custom(&'static str),
}

impl DependencyTag {
    /// Get the default timeout for this dependency type.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Cart => Duration::from_millis(8000),
            Self::Recommendations => Duration::from_millis(4000),
            Self::Analytics => Duration::from_millis(2000),
            Self::Custom(_) => Duration::from_millis(5000),
        }
    }

    /// Check if failures of this dependency must be shown to the shopper.
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Cart)
    }

    /// Get the name of this dependency.
    pub fn name(&self) -> &str {
        match self {
            Self::Cart => "cart",
            Self::Recommendations => "recommendations",
            Self::Analytics => "analytics",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for DependencyTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

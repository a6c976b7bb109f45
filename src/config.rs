use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Number of days a price is retained when no other age is configured.
pub const DEFAULT_MAX_CACHE_AGE_DAYS: u32 = 30;

/// Configuration for a [`PriceCache`](crate::PriceCache).
///
/// Deserializable so hosts can embed it in their own configuration; missing
/// fields fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceCacheConfig {
    /// Prices dated more than this many days before "today" are evicted by a sweep.
    pub max_cache_age_days: i64,
}

impl PriceCacheConfig {
    /// Checks the configuration and returns the retention window in days.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{ConfigError, PriceCacheConfig};
    ///
    /// let config = PriceCacheConfig { max_cache_age_days: -1 };
    /// assert_eq!(config.validate(), Err(ConfigError::NegativeMaxCacheAge { days: -1 }));
    /// ```
    pub fn validate(&self) -> Result<u64, ConfigError> {
        u64::try_from(self.max_cache_age_days).map_err(|_| ConfigError::NegativeMaxCacheAge {
            days: self.max_cache_age_days,
        })
    }
}

impl Default for PriceCacheConfig {
    fn default() -> Self {
        Self {
            max_cache_age_days: i64::from(DEFAULT_MAX_CACHE_AGE_DAYS),
        }
    }
}

use thiserror::Error;

/// Errors raised while building a [`PriceCache`](crate::PriceCache).
///
/// Queries and updates on a constructed cache never fail; misconfiguration is
/// rejected up front instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The retention window was negative.
    #[error("max cache age must be zero or more days, got {days}")]
    NegativeMaxCacheAge {
        /// The rejected number of days.
        days: i64,
    },
}

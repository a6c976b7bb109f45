//! A thread-safe, dual-indexed in-memory cache of market price quotes.
//!
//! Vendors publish bid/ask quotes for instruments, each dated. This crate keeps those
//! quotes in memory and answers two kinds of question, from either direction:
//!
//! - "What is the latest price?" for an instrument (one per vendor) or a vendor (one per instrument)
//! - "What was the price as of this date?" with an exact date match
//!
//! Stale quotes are evicted by an explicit sweep against a configurable retention window.
//!
//! ## Architecture
//!
//! 1. `Price`: An immutable quote value
//! 2. `PriceBucket`: The quotes for one (vendor, instrument) pair, latest first, one per date
//! 3. `PriceView`: A two-level grouping of buckets, by vendor or by instrument
//! 4. `PriceCache`: Two views over the same quotes behind a single fair `RwLock`
//!
//! Every insert updates both views under the write lock, and every query reads under
//! the read lock, so the two views can never be seen out of step.
//!
//! ## Example Usage
//!
//! ```rust
//! use price_cache::{Decimal, NaiveDate, Price, PriceCache};
//! use std::sync::Arc;
//!
//! // Share one cache between feed adapters, query callers and the sweeper
//! let cache = Arc::new(PriceCache::with_max_cache_age_days(30).unwrap());
//!
//! // 1. A feed adapter adds quotes (write lock, both views updated together)
//! let date = NaiveDate::from_ymd_opt(2020, 7, 3).unwrap();
//! cache.add(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::TEN));
//! cache.add(Price::new(date, "Equity", "GB0006640972", "Bloomberg", "XLON", Decimal::TEN, Decimal::ONE));
//!
//! // 2. Query the latest price per vendor (read lock)
//! let latest = cache.get_by_instrument("GB0006640972", None);
//! assert_eq!(latest.len(), 2);
//!
//! // 3. Query one vendor's prices for a specific date (read lock)
//! let on_date = cache.get_by_vendor("Reuters", Some(date));
//! assert_eq!(on_date.len(), 1);
//!
//! // 4. A scheduler periodically evicts stale quotes
//! let today = NaiveDate::from_ymd_opt(2020, 7, 10).unwrap();
//! assert_eq!(cache.clean_up_at(today), 0);
//! ```

mod config;
mod error;
mod price_bucket;
mod price_cache;
mod price_view;
mod service;
mod types;

// Re-export public API
pub use config::{PriceCacheConfig, DEFAULT_MAX_CACHE_AGE_DAYS};
pub use error::ConfigError;
pub use price_bucket::PriceBucket;
pub use price_cache::PriceCache;
pub use price_view::{GroupBy, PriceView};
pub use service::PricingService;
pub use types::{Price, PriceSet};

// Re-export commonly used external dependencies
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;

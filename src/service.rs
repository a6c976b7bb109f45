use crate::price_cache::PriceCache;
use crate::types::{Price, PriceSet};
use chrono::NaiveDate;

/// The operations feed adapters, schedulers and query callers rely on.
///
/// [`PriceCache`] is the in-memory implementation. Collaborators that only need
/// the operations can hold an `Arc<dyn PricingService>` instead of the concrete cache.
pub trait PricingService: Send + Sync {
    /// Adds a price; returns `false` if it was rejected as a same-date duplicate.
    fn add(&self, price: Price) -> bool;

    /// Latest price per vendor for `instrument`, or the prices dated exactly `as_of_date`.
    fn get_by_instrument(&self, instrument: &str, as_of_date: Option<NaiveDate>) -> PriceSet;

    /// Latest price per instrument from `vendor`, or the prices dated exactly `as_of_date`.
    fn get_by_vendor(&self, vendor: &str, as_of_date: Option<NaiveDate>) -> PriceSet;

    /// Every stored price.
    fn get_all_prices(&self) -> PriceSet;

    /// Evicts prices older than the configured retention window; returns how many were removed.
    fn clean_up(&self) -> usize;
}

impl PricingService for PriceCache {
    fn add(&self, price: Price) -> bool {
        PriceCache::add(self, price)
    }

    fn get_by_instrument(&self, instrument: &str, as_of_date: Option<NaiveDate>) -> PriceSet {
        PriceCache::get_by_instrument(self, instrument, as_of_date)
    }

    fn get_by_vendor(&self, vendor: &str, as_of_date: Option<NaiveDate>) -> PriceSet {
        PriceCache::get_by_vendor(self, vendor, as_of_date)
    }

    fn get_all_prices(&self) -> PriceSet {
        PriceCache::get_all_prices(self)
    }

    fn clean_up(&self) -> usize {
        PriceCache::clean_up(self)
    }
}

use crate::config::{PriceCacheConfig, DEFAULT_MAX_CACHE_AGE_DAYS};
use crate::error::ConfigError;
use crate::price_view::{GroupBy, PriceView};
use crate::types::{Price, PriceSet};
use chrono::{Days, NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, trace};

/// Both views over the same prices. Only ever touched through the cache's lock.
#[derive(Debug, Clone)]
struct PriceViews {
    by_vendor: PriceView,
    by_instrument: PriceView,
}

impl PriceViews {
    fn new() -> Self {
        PriceViews {
            by_vendor: PriceView::new(GroupBy::Vendor),
            by_instrument: PriceView::new(GroupBy::Instrument),
        }
    }

    fn insert(&mut self, price: &Price) -> bool {
        let stored_by_vendor = self.by_vendor.insert(price.clone());
        let stored_by_instrument = self.by_instrument.insert(price.clone());

        // Both views bucket by the same (vendor, instrument) pair.
        debug_assert_eq!(stored_by_vendor, stored_by_instrument);
        stored_by_vendor
    }

    fn remove(&mut self, price: &Price) -> bool {
        let removed_by_vendor = self.by_vendor.remove(price);
        let removed_by_instrument = self.by_instrument.remove(price);

        debug_assert_eq!(removed_by_vendor, removed_by_instrument);
        removed_by_vendor
    }

    fn view(&self, group_by: GroupBy) -> &PriceView {
        match group_by {
            GroupBy::Vendor => &self.by_vendor,
            GroupBy::Instrument => &self.by_instrument,
        }
    }
}

/// A thread-safe in-memory cache of price quotes, indexed both by vendor and by instrument.
///
/// Every price is stored twice: once grouped vendor then instrument, and once grouped
/// instrument then vendor. Within each (vendor, instrument) pair, prices are kept in a
/// bucket ordered by date, most recent first, holding at most one price per date.
///
/// ## Thread Safety
///
/// Both views sit behind a single `parking_lot::RwLock`, so no reader can ever observe
/// one view updated and the other not:
///
/// - Queries take the read lock and may run concurrently with each other
/// - `add`, `clear` and each eviction take the write lock
/// - The lock is task-fair, so a steady stream of readers cannot starve a writer
///
/// Queries return owned snapshots. The cache can be shared across threads with
/// `Arc<PriceCache>`; separate instances share no state.
///
/// ## Eviction
///
/// Nothing expires on its own. A scheduler owned by the caller should invoke
/// [`clean_up`](PriceCache::clean_up) periodically.
#[derive(Debug)]
pub struct PriceCache {
    /// Retention window, validated at construction
    max_cache_age_days: u64,
    /// The vendor and instrument views, guarded as one unit
    views: RwLock<PriceViews>,
}

impl PriceCache {
    /// Creates a new empty cache with the default retention window.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{PriceCache, DEFAULT_MAX_CACHE_AGE_DAYS};
    ///
    /// let cache = PriceCache::new();
    /// assert!(cache.is_empty());
    /// assert_eq!(cache.max_cache_age_days(), u64::from(DEFAULT_MAX_CACHE_AGE_DAYS));
    /// ```
    pub fn new() -> Self {
        PriceCache {
            max_cache_age_days: u64::from(DEFAULT_MAX_CACHE_AGE_DAYS),
            views: RwLock::new(PriceViews::new()),
        }
    }

    /// Creates a new empty cache from a configuration.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::NegativeMaxCacheAge`] if the retention window is negative.
    pub fn with_config(config: PriceCacheConfig) -> Result<Self, ConfigError> {
        let max_cache_age_days = config.validate()?;

        Ok(PriceCache {
            max_cache_age_days,
            views: RwLock::new(PriceViews::new()),
        })
    }

    /// Creates a new empty cache that retains prices for `max_cache_age_days` days.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{ConfigError, PriceCache};
    ///
    /// let cache = PriceCache::with_max_cache_age_days(7).unwrap();
    /// assert_eq!(cache.max_cache_age_days(), 7);
    ///
    /// let error = PriceCache::with_max_cache_age_days(-7).unwrap_err();
    /// assert_eq!(error, ConfigError::NegativeMaxCacheAge { days: -7 });
    /// ```
    pub fn with_max_cache_age_days(max_cache_age_days: i64) -> Result<Self, ConfigError> {
        Self::with_config(PriceCacheConfig { max_cache_age_days })
    }

    /// Returns the retention window in days.
    pub fn max_cache_age_days(&self) -> u64 {
        self.max_cache_age_days
    }

    /// Adds a price to both views as one atomic update.
    ///
    /// If the (vendor, instrument) bucket already holds a price for the same date,
    /// the new price is dropped and the stored one is kept, bid and ask included.
    ///
    /// ## Returns
    ///
    /// `true` if the price was stored, `false` if it was rejected as a same-date duplicate
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price, PriceCache};
    ///
    /// let cache = PriceCache::new();
    /// let date = NaiveDate::from_ymd_opt(2020, 7, 3).unwrap();
    ///
    /// assert!(cache.add(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::TEN)));
    /// assert!(!cache.add(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::ONE, Decimal::ONE)));
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn add(&self, price: Price) -> bool {
        let stored = self.views.write().insert(&price);

        if stored {
            trace!(
                vendor = %price.vendor,
                instrument = %price.instrument,
                as_of_date = %price.as_of_date,
                "stored price"
            );
            true
        } else {
            debug!(
                vendor = %price.vendor,
                instrument = %price.instrument,
                as_of_date = %price.as_of_date,
                "rejected price: bucket already holds this date"
            );
            false
        }
    }

    /// Returns prices for an instrument, one per vendor.
    ///
    /// - With `as_of_date` of `None`, returns each vendor's latest price for the instrument
    /// - With `Some(date)`, returns every vendor's price dated exactly `date`
    ///
    /// An instrument that was never added yields an empty set.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price, PriceCache};
    ///
    /// let cache = PriceCache::new();
    /// let day = |d| NaiveDate::from_ymd_opt(2020, 7, d).unwrap();
    ///
    /// cache.add(Price::new(day(4), "Equity", "GB00BCDBXK43", "Reuters", "XLON", Decimal::TEN, Decimal::TEN));
    /// cache.add(Price::new(day(3), "Equity", "GB00BCDBXK43", "Reuters", "XLON", Decimal::TEN, Decimal::ONE));
    /// cache.add(Price::new(day(4), "Equity", "GB00BCDBXK43", "Bloomberg", "XLON", Decimal::TEN, Decimal::TEN));
    ///
    /// assert_eq!(cache.get_by_instrument("GB00BCDBXK43", None).len(), 2);
    /// assert_eq!(cache.get_by_instrument("GB00BCDBXK43", Some(day(3))).len(), 1);
    /// assert!(cache.get_by_instrument("GB00BCDBXK43", Some(day(2))).is_empty());
    /// assert!(cache.get_by_instrument("GB00BMH46555", None).is_empty());
    /// ```
    pub fn get_by_instrument(&self, instrument: &str, as_of_date: Option<NaiveDate>) -> PriceSet {
        self.query(GroupBy::Instrument, instrument, as_of_date)
    }

    /// Returns prices from a vendor, one per instrument.
    ///
    /// - With `as_of_date` of `None`, returns the vendor's latest price for each instrument
    /// - With `Some(date)`, returns the vendor's prices dated exactly `date`
    ///
    /// A vendor that was never added yields an empty set.
    pub fn get_by_vendor(&self, vendor: &str, as_of_date: Option<NaiveDate>) -> PriceSet {
        self.query(GroupBy::Vendor, vendor, as_of_date)
    }

    /// Returns a snapshot of every price in the cache.
    pub fn get_all_prices(&self) -> PriceSet {
        self.views.read().by_vendor.iter().cloned().collect()
    }

    /// Evicts prices older than the retention window, measured from today's UTC date.
    ///
    /// See [`clean_up_at`](PriceCache::clean_up_at).
    pub fn clean_up(&self) -> usize {
        self.clean_up_at(Utc::now().date_naive())
    }

    /// Evicts every price dated on or before `today - max_cache_age_days`.
    ///
    /// A price exactly `max_cache_age_days` old has passed its last full day in the
    /// window by the time any sweep runs after midnight, so it goes too.
    ///
    /// The sweep runs in two phases. The expired prices are first selected from a
    /// snapshot taken under the read lock. Each one is then removed from both views
    /// under its own short write lock, so queries and inserts interleave with a long
    /// sweep. A price removed by someone else in between is simply skipped, which
    /// makes repeated or concurrent sweeps harmless. Prices added after the snapshot
    /// are untouched.
    ///
    /// ## Returns
    ///
    /// The number of prices actually removed
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price, PriceCache};
    ///
    /// let cache = PriceCache::with_max_cache_age_days(30).unwrap();
    /// let today = NaiveDate::from_ymd_opt(2020, 7, 31).unwrap();
    ///
    /// for (month, day) in [(6, 1), (7, 1), (7, 15)] {
    ///     let date = NaiveDate::from_ymd_opt(2020, month, day).unwrap();
    ///     cache.add(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::TEN));
    /// }
    ///
    /// // The cutoff is 2020-07-01, so the June 1st and July 1st prices are evicted.
    /// assert_eq!(cache.clean_up_at(today), 2);
    /// assert_eq!(cache.clean_up_at(today), 0);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn clean_up_at(&self, today: NaiveDate) -> usize {
        let Some(cutoff) = today.checked_sub_days(Days::new(self.max_cache_age_days)) else {
            debug!(
                %today,
                max_cache_age_days = self.max_cache_age_days,
                "cutoff precedes all dates, nothing to evict"
            );
            return 0;
        };

        let expired: Vec<Price> = self
            .get_all_prices()
            .into_iter()
            .filter(|price| price.as_of_date <= cutoff)
            .collect();

        let mut removed = 0;
        for price in &expired {
            if self.views.write().remove(price) {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(%cutoff, expired = expired.len(), removed, "evicted stale prices");
        } else {
            debug!(%cutoff, "no stale prices to evict");
        }

        removed
    }

    /// Returns the number of prices in the cache.
    pub fn len(&self) -> usize {
        self.views.read().by_vendor.len()
    }

    /// Returns `true` if the cache holds no prices.
    pub fn is_empty(&self) -> bool {
        self.views.read().by_vendor.is_empty()
    }

    /// Clears every price from both views.
    ///
    /// This is useful for testing or resetting the cache state.
    pub fn clear(&self) {
        let mut views = self.views.write();
        views.by_vendor.clear();
        views.by_instrument.clear();
    }

    fn query(&self, group_by: GroupBy, key: &str, as_of_date: Option<NaiveDate>) -> PriceSet {
        let views = self.views.read();
        let view = views.view(group_by);

        match as_of_date {
            None => view.latest(key),
            Some(date) => view.on_date(key, date),
        }
    }
}

impl Default for PriceCache {
    fn default() -> Self {
        Self::new()
    }
}

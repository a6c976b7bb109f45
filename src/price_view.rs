use crate::price_bucket::PriceBucket;
use crate::types::{Price, PriceSet};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Which price field a [`PriceView`] groups by first.
///
/// The other of instrument and vendor becomes the secondary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    /// Vendor, then instrument
    Vendor,
    /// Instrument, then vendor
    Instrument,
}

impl GroupBy {
    /// Returns the `(primary, secondary)` keys of `price` for this grouping.
    pub fn keys(self, price: &Price) -> (&str, &str) {
        match self {
            GroupBy::Vendor => (&price.vendor, &price.instrument),
            GroupBy::Instrument => (&price.instrument, &price.vendor),
        }
    }
}

/// A two-level grouping of prices: primary key, then secondary key, then a date-ordered bucket.
///
/// The cache keeps two of these over the same prices, one keyed vendor then instrument
/// and one keyed instrument then vendor. A view does no locking of its own; it is always
/// accessed through the cache's single lock.
#[derive(Debug, Clone)]
pub struct PriceView {
    group_by: GroupBy,
    groups: HashMap<String, HashMap<String, PriceBucket>>,
}

impl PriceView {
    /// Creates a new empty view grouped by `group_by`.
    pub fn new(group_by: GroupBy) -> Self {
        PriceView {
            group_by,
            groups: HashMap::new(),
        }
    }

    /// Inserts a price under its keys, creating the bucket if needed.
    ///
    /// ## Returns
    ///
    /// `true` if stored, `false` if the bucket already held a price for that date
    pub fn insert(&mut self, price: Price) -> bool {
        let (primary, secondary) = self.group_by.keys(&price);

        let bucket = self
            .groups
            .entry(primary.to_owned())
            .or_default()
            .entry(secondary.to_owned())
            .or_default();

        bucket.insert(price)
    }

    /// Returns the latest price of every bucket under `primary`.
    ///
    /// An unknown primary key yields an empty set.
    pub fn latest(&self, primary: &str) -> PriceSet {
        self.groups
            .get(primary)
            .map(|buckets| {
                buckets
                    .values()
                    .filter_map(PriceBucket::latest)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns every price under `primary` dated exactly `as_of_date`.
    ///
    /// An unknown primary key yields an empty set.
    pub fn on_date(&self, primary: &str, as_of_date: NaiveDate) -> PriceSet {
        self.groups
            .get(primary)
            .map(|buckets| {
                buckets
                    .values()
                    .filter_map(|bucket| bucket.on_date(as_of_date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Removes `price` from the bucket under its keys.
    ///
    /// Buckets and primary groups left empty are dropped, so a fully evicted key is
    /// unknown again. Removing an absent price is a no-op.
    ///
    /// ## Returns
    ///
    /// `true` if a price was removed
    pub fn remove(&mut self, price: &Price) -> bool {
        let (primary, secondary) = self.group_by.keys(price);

        let Some(buckets) = self.groups.get_mut(primary) else {
            return false;
        };
        let Some(bucket) = buckets.get_mut(secondary) else {
            return false;
        };

        let removed = bucket.remove(price);

        if bucket.is_empty() {
            buckets.remove(secondary);
        }
        if buckets.is_empty() {
            self.groups.remove(primary);
        }

        removed
    }

    /// Iterates over every price in the view.
    pub fn iter(&self) -> impl Iterator<Item = &Price> {
        self.groups
            .values()
            .flat_map(|buckets| buckets.values())
            .flat_map(PriceBucket::iter)
    }

    /// Returns the total number of prices in the view.
    pub fn len(&self) -> usize {
        self.groups
            .values()
            .flat_map(|buckets| buckets.values())
            .map(PriceBucket::len)
            .sum()
    }

    /// Returns `true` if the view holds no prices.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns `true` if `primary` has at least one price in this view.
    pub fn contains_key(&self, primary: &str) -> bool {
        self.groups.contains_key(primary)
    }

    /// Drops every price.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

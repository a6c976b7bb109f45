use crate::types::Price;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// The prices held for one (primary, secondary) key pair, most recent first.
///
/// A bucket is keyed by date alone and holds at most one price per date. Because
/// every price in a bucket already shares the same instrument and vendor, ordering
/// by date is enough to keep "latest" well defined.
///
/// ### Same-date inserts
///
/// The first price stored for a date wins. Inserting another price with the same
/// date is rejected, even if its bid, ask or market differ.
#[derive(Debug, Clone, Default)]
pub struct PriceBucket {
    /// Prices keyed by descending date, so the first entry is the latest
    prices: BTreeMap<Reverse<NaiveDate>, Price>,
}

impl PriceBucket {
    /// Creates a new empty bucket.
    pub fn new() -> Self {
        PriceBucket {
            prices: BTreeMap::new(),
        }
    }

    /// Inserts a price unless the bucket already holds one for the same date.
    ///
    /// This is $O(\log{N})$ where $N$ is the number of dates in the bucket.
    ///
    /// ## Returns
    ///
    /// `true` if the price was stored, `false` if it was rejected as a same-date duplicate
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price, PriceBucket};
    ///
    /// let date = NaiveDate::from_ymd_opt(2020, 7, 3).unwrap();
    /// let mut bucket = PriceBucket::new();
    ///
    /// assert!(bucket.insert(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::TEN)));
    /// assert!(!bucket.insert(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::ONE, Decimal::ONE)));
    /// assert_eq!(bucket.latest().unwrap().bid, Decimal::TEN);
    /// ```
    pub fn insert(&mut self, price: Price) -> bool {
        match self.prices.entry(Reverse(price.as_of_date)) {
            Entry::Vacant(slot) => {
                slot.insert(price);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns the most recent price in the bucket, if any.
    ///
    /// The map is keyed by `Reverse<NaiveDate>`, so the first entry holds the latest date.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price, PriceBucket};
    ///
    /// let mut bucket = PriceBucket::new();
    /// for day in [2, 4, 3] {
    ///     let date = NaiveDate::from_ymd_opt(2020, 7, day).unwrap();
    ///     bucket.insert(Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::TEN));
    /// }
    ///
    /// assert_eq!(bucket.latest().unwrap().as_of_date, NaiveDate::from_ymd_opt(2020, 7, 4).unwrap());
    /// ```
    pub fn latest(&self) -> Option<&Price> {
        self.prices.values().next()
    }

    /// Returns the price dated exactly `as_of_date`, if any.
    pub fn on_date(&self, as_of_date: NaiveDate) -> Option<&Price> {
        self.prices.get(&Reverse(as_of_date))
    }

    /// Removes `price` if the bucket holds a price equal to it.
    ///
    /// The lookup is by date, then confirmed by full equality, so a different price
    /// that merely shares the date is left alone. Removing an absent price is a no-op.
    ///
    /// ## Returns
    ///
    /// `true` if a price was removed
    pub fn remove(&mut self, price: &Price) -> bool {
        let key = Reverse(price.as_of_date);

        match self.prices.get(&key) {
            Some(stored) if stored == price => {
                self.prices.remove(&key);
                true
            }
            _ => false,
        }
    }

    /// Iterates over the prices from most recent to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Price> {
        self.prices.values()
    }

    /// Returns the number of prices (distinct dates) in the bucket.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Returns `true` if the bucket holds no prices.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

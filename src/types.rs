use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Represents one vendor's quote for one instrument on one market, as of one date.
///
/// Prices are plain values: the cache stores its own copies and only ever hands
/// out clones, so a `Price` obtained from a query never changes underneath the caller.
///
/// Two prices are equal when their date, asset class, instrument, vendor and market
/// match. The `bid` and `ask` are the quote payload and take no part in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Price {
    /// The date the quote applies to
    pub as_of_date: NaiveDate,
    /// Asset class tag such as `"Equity"`, informational only
    pub asset_class: String,
    /// Instrument identifier (for example an ISIN)
    pub instrument: String,
    /// Data vendor that published the quote
    pub vendor: String,
    /// Venue identifier (for example a MIC such as `"XLON"`)
    pub market: String,
    /// Bid side of the quote
    pub bid: Decimal,
    /// Ask side of the quote
    pub ask: Decimal,
}

impl Price {
    /// Creates a new price quote.
    ///
    /// ## Examples
    ///
    /// ```
    /// use price_cache::{Decimal, NaiveDate, Price};
    ///
    /// let date = NaiveDate::from_ymd_opt(2020, 7, 3).unwrap();
    /// let price = Price::new(date, "Equity", "GB0006640972", "Reuters", "XLON", Decimal::TEN, Decimal::ONE);
    /// assert_eq!(price.vendor, "Reuters");
    /// ```
    pub fn new(
        as_of_date: NaiveDate,
        asset_class: impl Into<String>,
        instrument: impl Into<String>,
        vendor: impl Into<String>,
        market: impl Into<String>,
        bid: Decimal,
        ask: Decimal,
    ) -> Self {
        Self {
            as_of_date,
            asset_class: asset_class.into(),
            instrument: instrument.into(),
            vendor: vendor.into(),
            market: market.into(),
            bid,
            ask,
        }
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.as_of_date == other.as_of_date
            && self.asset_class == other.asset_class
            && self.instrument == other.instrument
            && self.vendor == other.vendor
            && self.market == other.market
    }
}

impl Eq for Price {}

// Must hash exactly the fields compared by `eq`.
impl Hash for Price {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_of_date.hash(state);
        self.asset_class.hash(state);
        self.instrument.hash(state);
        self.vendor.hash(state);
        self.market.hash(state);
    }
}

/// Type alias for the result of every cache query.
///
/// Queries return owned snapshots, never live views into the cache.
pub type PriceSet = HashSet<Price>;

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(bid: i64, ask: i64) -> Price {
        Price::new(
            NaiveDate::from_ymd_opt(2020, 7, 3).unwrap(),
            "Equity",
            "GB00BCDBXK43",
            "Bloomberg",
            "XLON",
            Decimal::new(bid, 0),
            Decimal::new(ask, 0),
        )
    }

    #[test]
    fn test_bid_and_ask_do_not_affect_identity() {
        let first = quote(10, 10);
        let second = quote(10, 1);

        assert_eq!(first, second);

        let mut set = PriceSet::new();
        set.insert(first);
        assert!(!set.insert(second), "Same identity must collapse in a set");
    }

    #[test]
    fn test_market_is_part_of_identity() {
        let mut other_market = quote(10, 10);
        other_market.market = "XPAR".to_owned();

        assert_ne!(quote(10, 10), other_market);
    }

    #[test]
    fn test_price_deserializes_from_feed_json() {
        let json = r#"{
            "as_of_date": "2020-07-03",
            "asset_class": "Equity",
            "instrument": "GB00BCDBXK43",
            "vendor": "Bloomberg",
            "market": "XLON",
            "bid": "10.25",
            "ask": "10.50"
        }"#;

        let price: Price = serde_json::from_str(json).unwrap();

        assert_eq!(price, quote(0, 0));
        assert_eq!(price.bid, Decimal::new(1025, 2));
        assert_eq!(price.ask, Decimal::new(1050, 2));
    }
}

use crate::currency::{CurrencyPair, RateSource};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Currency every pair converts out of, and the base the rate service is queried with.
pub const BASE_CURRENCY: &str = "TWD";

/// Response body of `GET /v4/latest/{base}`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LatestRatesResponse {
    pub base: String,
    pub date: Option<String>,
    pub rates: HashMap<String, Decimal>,
}

/// Where a rate table came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RateOrigin {
    Live,
    Cached,
    Default,
}

impl fmt::Display for RateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => f.write_str("live"),
            Self::Cached => f.write_str("cached"),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateTable {
    pub base: String,
    pub rates: BTreeMap<String, Decimal>,
    pub origin: RateOrigin,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Approximate TWD quotes used when neither the service nor the cache can answer.
pub fn default_rates() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("JPY".to_string(), dec!(4.32)),
        ("USD".to_string(), dec!(0.032)),
        ("CNY".to_string(), dec!(0.23)),
        ("KRW".to_string(), dec!(42.5)),
    ])
}

impl RateTable {
    pub fn defaults() -> Self {
        Self {
            base: BASE_CURRENCY.to_string(),
            rates: default_rates(),
            origin: RateOrigin::Default,
            fetched_at: None,
        }
    }

    /// Keep the quotes the converter needs. A code the service omitted or
    /// quoted as non-positive takes its default value.
    pub fn from_latest(response: &LatestRatesResponse, fetched_at: DateTime<Utc>) -> Self {
        let rates = default_rates()
            .into_iter()
            .map(|(code, fallback)| {
                let rate = response
                    .rates
                    .get(&code)
                    .copied()
                    .filter(|rate| *rate > Decimal::ZERO)
                    .unwrap_or(fallback);
                (code, rate)
            })
            .collect();

        Self {
            base: response.base.clone(),
            rates,
            origin: RateOrigin::Live,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn with_origin(mut self, origin: RateOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn rate_for(&self, code: &str) -> Option<Decimal> {
        self.rates
            .get(code)
            .copied()
            .filter(|rate| *rate > Decimal::ZERO)
    }

    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.fetched_at {
            Some(fetched_at) => now.signed_duration_since(fetched_at) < max_age,
            None => false,
        }
    }
}

impl RateSource for RateTable {
    fn rate(&self, pair: CurrencyPair) -> Option<Decimal> {
        if pair.from_code() != self.base {
            return None;
        }
        self.rate_for(pair.to_code())
    }
}

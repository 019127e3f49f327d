use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency pairs offered by the converter. Every pair converts out of
/// the base currency the rate service quotes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurrencyPair {
    #[default]
    #[serde(rename = "TWD_JPY")]
    TwdJpy,
    #[serde(rename = "TWD_USD")]
    TwdUsd,
    #[serde(rename = "TWD_CNY")]
    TwdCny,
    #[serde(rename = "TWD_KRW")]
    TwdKrw,
}

impl CurrencyPair {
    pub const ALL: [CurrencyPair; 4] = [Self::TwdJpy, Self::TwdUsd, Self::TwdCny, Self::TwdKrw];

    pub fn id(&self) -> &'static str {
        match self {
            Self::TwdJpy => "TWD_JPY",
            Self::TwdUsd => "TWD_USD",
            Self::TwdCny => "TWD_CNY",
            Self::TwdKrw => "TWD_KRW",
        }
    }

    pub fn from_code(&self) -> &'static str {
        "TWD"
    }

    pub fn to_code(&self) -> &'static str {
        match self {
            Self::TwdJpy => "JPY",
            Self::TwdUsd => "USD",
            Self::TwdCny => "CNY",
            Self::TwdKrw => "KRW",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TwdJpy => "New Taiwan Dollar → Japanese Yen",
            Self::TwdUsd => "New Taiwan Dollar → US Dollar",
            Self::TwdCny => "New Taiwan Dollar → Chinese Yuan",
            Self::TwdKrw => "New Taiwan Dollar → South Korean Won",
        }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CurrencyPair {
    type Err = Error;

    /// Accepts the pair id (`TWD_JPY`) or just the target code (`JPY`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|pair| pair.id() == wanted || pair.to_code() == wanted)
            .ok_or_else(|| Error::UnknownCurrencyPair(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_id_and_code() {
        assert_eq!("TWD_USD".parse::<CurrencyPair>().unwrap(), CurrencyPair::TwdUsd);
        assert_eq!("krw".parse::<CurrencyPair>().unwrap(), CurrencyPair::TwdKrw);
        assert_eq!(" twd_cny ".parse::<CurrencyPair>().unwrap(), CurrencyPair::TwdCny);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "EUR".parse::<CurrencyPair>().unwrap_err();
        assert_eq!(err.to_string(), "unknown currency pair 'EUR'");
    }

    #[test]
    fn test_serde_uses_id() {
        let json = serde_json::to_string(&CurrencyPair::TwdJpy).unwrap();
        assert_eq!(json, "\"TWD_JPY\"");
        let pair: CurrencyPair = serde_json::from_str("\"TWD_KRW\"").unwrap();
        assert_eq!(pair, CurrencyPair::TwdKrw);
    }

    #[test]
    fn test_default_is_first_pair() {
        assert_eq!(CurrencyPair::default(), CurrencyPair::ALL[0]);
        assert_eq!(CurrencyPair::default().to_code(), "JPY");
    }
}

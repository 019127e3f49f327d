pub mod converter;
pub mod pair;

pub use converter::{ConversionState, RateSource, resolve_active_rate, round2};
pub use pair::CurrencyPair;

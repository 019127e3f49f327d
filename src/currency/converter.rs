//! Two-way currency converter.
//!
//! Whichever amount the user edited last is authoritative and the other
//! one is derived from it through the active rate. Unparseable input is
//! not an error: it clears the derived amount and the caller shows an
//! empty field.

use crate::currency::pair::CurrencyPair;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Anything able to quote a fetched rate for a currency pair.
pub trait RateSource {
    fn rate(&self, pair: CurrencyPair) -> Option<Decimal>;
}

/// Round half-up to two decimal places, as currency amounts are displayed.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

/// Rates are stored unrounded and shown with four decimals.
pub fn format_rate(rate: Decimal) -> String {
    format!(
        "{:.4}",
        rate.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Parse user-entered numeric text. Empty or malformed text is `None`.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

fn parse_positive(text: &str) -> Option<Decimal> {
    parse_decimal(text).filter(|rate| *rate > Decimal::ZERO)
}

/// The rate in effect: a valid manual override when enabled, else the
/// fetched rate, else zero ("no conversion possible").
pub fn resolve_active_rate(
    use_manual_rate: bool,
    manual_rate: &str,
    fetched_rate: Option<Decimal>,
) -> Decimal {
    if use_manual_rate {
        if let Some(rate) = parse_positive(manual_rate) {
            return rate;
        }
    }
    fetched_rate
        .filter(|rate| *rate > Decimal::ZERO)
        .unwrap_or(Decimal::ZERO)
}

fn multiply(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    if rate <= Decimal::ZERO {
        return None;
    }
    amount.checked_mul(rate).map(round2)
}

fn divide(amount: Decimal, rate: Decimal) -> Option<Decimal> {
    if rate <= Decimal::ZERO {
        return None;
    }
    amount.checked_div(rate).map(round2)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionState {
    pair: CurrencyPair,
    from_amount: Option<Decimal>,
    to_amount: Option<Decimal>,
    fetched_rate: Option<Decimal>,
    manual_rate: String,
    use_manual_rate: bool,
}

impl ConversionState {
    pub fn new(pair: CurrencyPair, fetched_rate: Option<Decimal>) -> Self {
        Self {
            pair,
            fetched_rate,
            ..Self::default()
        }
    }

    /// Start from the fetched rate a source quotes for `pair`.
    pub fn from_source(pair: CurrencyPair, source: &dyn RateSource) -> Self {
        Self::new(pair, source.rate(pair))
    }

    pub fn pair(&self) -> CurrencyPair {
        self.pair
    }

    pub fn from_amount(&self) -> Option<Decimal> {
        self.from_amount
    }

    pub fn to_amount(&self) -> Option<Decimal> {
        self.to_amount
    }

    pub fn fetched_rate(&self) -> Option<Decimal> {
        self.fetched_rate
    }

    pub fn manual_rate(&self) -> &str {
        &self.manual_rate
    }

    pub fn use_manual_rate(&self) -> bool {
        self.use_manual_rate
    }

    pub fn active_rate(&self) -> Decimal {
        resolve_active_rate(self.use_manual_rate, &self.manual_rate, self.fetched_rate)
    }

    /// Source-currency amount edited. Derives the target amount.
    pub fn set_from_amount(&mut self, text: &str) {
        let Some(amount) = parse_decimal(text) else {
            self.clear_amounts();
            return;
        };
        self.from_amount = Some(amount);
        self.to_amount = multiply(amount, self.active_rate());
    }

    /// Target-currency amount edited. Derives the source amount.
    pub fn set_to_amount(&mut self, text: &str) {
        let Some(amount) = parse_decimal(text) else {
            self.clear_amounts();
            return;
        };
        self.to_amount = Some(amount);
        self.from_amount = divide(amount, self.active_rate());
    }

    /// Manual rate text edited. Only recomputes while manual mode is on.
    pub fn set_manual_rate(&mut self, text: &str) {
        self.manual_rate = text.trim().to_string();
        if !self.use_manual_rate {
            return;
        }
        if let Some(from) = self.from_amount {
            self.to_amount = parse_positive(&self.manual_rate).and_then(|rate| multiply(from, rate));
        }
    }

    /// Flip between manual and fetched rate. Entering manual mode without
    /// a usable manual value clears the target amount instead of falling
    /// back to the fetched rate.
    pub fn toggle_manual_rate(&mut self) {
        self.use_manual_rate = !self.use_manual_rate;

        let Some(from) = self.from_amount else {
            return;
        };
        let rate = if self.use_manual_rate {
            parse_positive(&self.manual_rate)
        } else {
            self.fetched_rate
        };
        self.to_amount = rate.and_then(|rate| multiply(from, rate));
    }

    pub fn set_use_manual_rate(&mut self, enabled: bool) {
        if self.use_manual_rate != enabled {
            self.toggle_manual_rate();
        }
    }

    /// Switch pair. Amounts are cleared; manual settings are kept.
    pub fn select_pair(&mut self, pair: CurrencyPair, fetched_rate: Option<Decimal>) {
        self.pair = pair;
        self.fetched_rate = fetched_rate;
        self.clear_amounts();
    }

    pub fn clear_amounts(&mut self) {
        self.from_amount = None;
        self.to_amount = None;
    }
}

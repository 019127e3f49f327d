use crate::OutputFormat;
use crate::commands::{current_rates, open_store, print_json};
use crate::config::Config;
use crate::currency::converter::{format_amount, format_rate};
use crate::currency::{ConversionState, CurrencyPair};
use crate::rates::models::RateTable;
use crate::session::Session;
use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Args, Debug, Clone, Default)]
pub struct ConversionArgs {
    #[arg(long, help = "Currency pair, e.g. TWD_JPY or just JPY")]
    pub pair: Option<CurrencyPair>,
    #[arg(long, conflicts_with = "to", help = "Amount in the source currency (TWD)")]
    pub from: Option<String>,
    #[arg(long, help = "Amount in the target currency")]
    pub to: Option<String>,
    #[arg(long, help = "Use this rate instead of the fetched one")]
    pub manual_rate: Option<String>,
    #[arg(long, conflicts_with = "manual_rate", help = "Go back to the fetched rate")]
    pub auto_rate: bool,
}

impl ConversionArgs {
    /// Replay the command-line edits on a converter, in the order a user
    /// would make them: rate settings first, then the amount.
    pub fn apply(&self, state: &mut ConversionState) {
        if let Some(rate) = &self.manual_rate {
            state.set_manual_rate(rate);
            state.set_use_manual_rate(true);
        }
        if self.auto_rate {
            state.set_use_manual_rate(false);
        }
        if let Some(amount) = &self.from {
            state.set_from_amount(amount);
        } else if let Some(amount) = &self.to {
            state.set_to_amount(amount);
        }
    }
}

/// Converter restored from the session with `args` applied.
pub(crate) fn prepare(
    session: &Session,
    rates: &RateTable,
    args: &ConversionArgs,
) -> ConversionState {
    let mut state = session.converter(args.pair, rates);
    args.apply(&mut state);
    state
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversionReport {
    pair: CurrencyPair,
    from_currency: &'static str,
    to_currency: &'static str,
    from_amount: Option<Decimal>,
    to_amount: Option<Decimal>,
    rate: Option<Decimal>,
    rate_source: String,
}

impl ConversionReport {
    fn new(state: &ConversionState, rates: &RateTable) -> Self {
        let pair = state.pair();
        let rate = state.active_rate();
        let rate_source = if state.use_manual_rate() {
            "manual".to_string()
        } else {
            rates.origin.to_string()
        };
        Self {
            pair,
            from_currency: pair.from_code(),
            to_currency: pair.to_code(),
            from_amount: state.from_amount(),
            to_amount: state.to_amount(),
            rate: (rate > Decimal::ZERO).then_some(rate),
            rate_source,
        }
    }

    fn print_text(&self) {
        let amount = |value: Option<Decimal>| value.map_or_else(|| "--".to_string(), format_amount);

        println!("{}", self.pair.name());
        if self.from_amount.is_some() || self.to_amount.is_some() {
            println!(
                "{} {} = {} {}",
                amount(self.from_amount),
                self.from_currency,
                amount(self.to_amount),
                self.to_currency
            );
        }
        match self.rate {
            Some(rate) => println!(
                "Rate: 1 {} = {} {} ({})",
                self.from_currency,
                format_rate(rate),
                self.to_currency,
                self.rate_source
            ),
            None => println!("Rate: unavailable, set one with --manual-rate"),
        }
    }
}

pub fn convert(config: &Config, args: &ConversionArgs, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let rates = current_rates(config, &store, false);

    let state = store.update::<Session, _, _>(|session| {
        let state = prepare(session, &rates, args);
        session.remember(&state);
        Ok(state)
    })?;

    let report = ConversionReport::new(&state, &rates);
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => report.print_text(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args() -> ConversionArgs {
        ConversionArgs::default()
    }

    #[test]
    fn test_from_amount_uses_fetched_rate() {
        let state = prepare(
            &Session::default(),
            &RateTable::defaults(),
            &ConversionArgs {
                from: Some("100".to_string()),
                ..args()
            },
        );
        assert_eq!(state.to_amount(), Some(dec!(432.00)));
    }

    #[test]
    fn test_manual_rate_applies_before_amount() {
        let state = prepare(
            &Session::default(),
            &RateTable::defaults(),
            &ConversionArgs {
                pair: Some(CurrencyPair::TwdUsd),
                to: Some("10".to_string()),
                manual_rate: Some("0.03125".to_string()),
                ..args()
            },
        );
        assert!(state.use_manual_rate());
        assert_eq!(state.from_amount(), Some(dec!(320.00)));
    }

    #[test]
    fn test_auto_rate_leaves_manual_mode() {
        let session = Session {
            manual_rate: "5".to_string(),
            use_manual_rate: true,
            ..Session::default()
        };
        let state = prepare(
            &session,
            &RateTable::defaults(),
            &ConversionArgs {
                from: Some("10".to_string()),
                auto_rate: true,
                ..args()
            },
        );
        assert!(!state.use_manual_rate());
        assert_eq!(state.manual_rate(), "5");
        assert_eq!(state.to_amount(), Some(dec!(43.20)));
    }

    #[test]
    fn test_report_hides_missing_rate() {
        let mut rates = RateTable::defaults();
        rates.rates.clear();
        let state = prepare(&Session::default(), &rates, &args());
        let report = ConversionReport::new(&state, &rates);
        assert_eq!(report.rate, None);
        assert_eq!(report.rate_source, "built-in defaults");
    }
}

use crate::OutputFormat;
use crate::commands::{current_rates, open_store, print_json};
use crate::config::Config;
use crate::currency::converter::format_rate;
use crate::currency::{CurrencyPair, RateSource};
use anyhow::Result;

pub fn show(config: &Config, refresh: bool, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let table = current_rates(config, &store, refresh);

    if let OutputFormat::Json = format {
        return print_json(&table);
    }

    match table.fetched_at {
        Some(at) => println!(
            "Exchange rates ({}, fetched {})",
            table.origin,
            at.format("%Y-%m-%d %H:%M UTC")
        ),
        None => println!("Exchange rates ({})", table.origin),
    }
    for pair in CurrencyPair::ALL {
        let rate = table
            .rate(pair)
            .map_or_else(|| "--".to_string(), format_rate);
        println!("  1 {} = {:>10} {}", pair.from_code(), rate, pair.to_code());
    }
    Ok(())
}

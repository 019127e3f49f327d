use crate::OutputFormat;
use crate::commands::convert::{ConversionArgs, prepare};
use crate::commands::{current_rates, open_store, print_json, resolve_trip_id};
use crate::config::Config;
use crate::currency::converter::{format_amount, format_rate};
use crate::expense::{Expense, ExpenseLedger, SUGGESTED_DESCRIPTIONS};
use crate::session::Session;
use crate::trip::TripBook;
use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn add(
    config: &Config,
    trip: Option<String>,
    description: &str,
    date: Option<NaiveDate>,
    conversion: &ConversionArgs,
) -> Result<()> {
    let store = open_store(config)?;
    let trip_id = resolve_trip_id(&store, trip)?;
    let rates = current_rates(config, &store, false);
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let expense = store.locked(|store| {
        let mut session = store.load::<Session>()?;
        let mut state = prepare(&session, &rates, conversion);
        let mut expense = Expense::from_conversion(description, date, &state, Utc::now())?;

        // Trip may have been removed since it was resolved
        store.load::<TripBook>()?.get(&trip_id)?;
        let mut ledger = store.load::<ExpenseLedger>()?;
        expense.id = ledger.record(&trip_id, expense.clone());
        store.save(&ledger)?;

        state.clear_amounts();
        session.remember(&state);
        store.save(&session)?;
        Ok(expense)
    })?;

    println!(
        "✓ Recorded '{}': {} {} = {} {} @ {}",
        expense.description,
        format_amount(expense.from_amount),
        expense.from_currency,
        format_amount(expense.to_amount),
        expense.to_currency,
        format_rate(expense.rate)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct ExpenseReport<'a> {
    trip_id: &'a str,
    expenses: Vec<&'a Expense>,
    total: Decimal,
}

pub fn list(config: &Config, trip: Option<String>, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let trip_id = resolve_trip_id(&store, trip)?;
    let ledger = store.load::<ExpenseLedger>()?;

    let report = ExpenseReport {
        trip_id: &trip_id,
        expenses: ledger.for_trip(&trip_id),
        total: ledger.total(&trip_id),
    };

    if let OutputFormat::Json = format {
        return print_json(&report);
    }

    if report.expenses.is_empty() {
        println!("No expenses recorded for this trip.");
        return Ok(());
    }

    println!(
        "{:<15} {:<12} {:<18} {:>12} {:>14} {:>10}",
        "ID", "Date", "Description", "Amount", "Converted", "Rate"
    );
    println!("{}", "-".repeat(86));
    for e in &report.expenses {
        println!(
            "{:<15} {:<12} {:<18} {:>8} {} {:>10} {} {:>10}",
            e.id,
            e.date,
            e.description,
            format_amount(e.from_amount),
            e.from_currency,
            format_amount(e.to_amount),
            e.to_currency,
            format_rate(e.rate)
        );
    }
    println!("{}", "-".repeat(86));
    println!("Total: {} TWD", format_amount(report.total));
    Ok(())
}

pub fn remove(config: &Config, trip: Option<String>, expense_id: &str) -> Result<()> {
    let store = open_store(config)?;
    let trip_id = resolve_trip_id(&store, trip)?;
    let removed =
        store.update::<ExpenseLedger, _, _>(|ledger| Ok(ledger.delete(&trip_id, expense_id)?))?;
    println!("✓ Deleted expense '{}'", removed.description);
    Ok(())
}

pub fn tags(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&SUGGESTED_DESCRIPTIONS)?,
        OutputFormat::Text => println!("{}", SUGGESTED_DESCRIPTIONS.join(", ")),
    }
    Ok(())
}

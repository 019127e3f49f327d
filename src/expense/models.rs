use crate::currency::{ConversionState, CurrencyPair};
use crate::error::{Error, Result};
use crate::store::Document;
use crate::utils::ids::generate_id;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quick-pick descriptions offered when recording an expense.
pub const SUGGESTED_DESCRIPTIONS: &[&str] = &[
    "Breakfast",
    "Lunch",
    "Dinner",
    "Transport",
    "Snack",
    "Drinks",
    "Souvenir",
    "Gift",
    "Tickets",
];

/// One recorded conversion, amounts in both currencies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    pub description: String,
    /// Moment of recording. Entries from older exports only carry `date`.
    pub date_time: Option<DateTime<Utc>>,
    pub date: NaiveDate,
    pub currency_pair: CurrencyPair,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub rate: Decimal,
}

impl Expense {
    /// Capture the converter's current amounts and active rate.
    pub fn from_conversion(
        description: &str,
        date: NaiveDate,
        conversion: &ConversionState,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::MissingDescription);
        }

        let (Some(from_amount), Some(to_amount)) =
            (conversion.from_amount(), conversion.to_amount())
        else {
            return Err(Error::IncompleteConversion);
        };

        let rate = conversion.active_rate();
        if rate <= Decimal::ZERO {
            return Err(Error::NoActiveRate(conversion.pair().to_string()));
        }

        let pair = conversion.pair();
        Ok(Self {
            id: String::new(),
            description: description.to_string(),
            date_time: Some(recorded_at),
            date,
            currency_pair: pair,
            from_currency: pair.from_code().to_string(),
            to_currency: pair.to_code().to_string(),
            from_amount,
            to_amount,
            rate,
        })
    }

    fn sort_key(&self) -> DateTime<Utc> {
        self.date_time
            .unwrap_or_else(|| self.date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
    }
}

/// Expenses grouped by trip id, persisted as one JSON object.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ExpenseLedger {
    by_trip: BTreeMap<String, Vec<Expense>>,
}

impl Document for ExpenseLedger {
    const FILE_NAME: &'static str = "expenses.json";
}

impl ExpenseLedger {
    /// Store an expense under a trip and return its new id.
    pub fn record(&mut self, trip_id: &str, mut expense: Expense) -> String {
        let expenses = self.by_trip.entry(trip_id.to_string()).or_default();
        expense.id = generate_id(expenses.iter().map(|e| e.id.as_str()));
        let id = expense.id.clone();
        expenses.push(expense);
        id
    }

    pub fn delete(&mut self, trip_id: &str, expense_id: &str) -> Result<Expense> {
        let not_found = || Error::ExpenseNotFound {
            trip_id: trip_id.to_string(),
            expense_id: expense_id.to_string(),
        };
        let expenses = self.by_trip.get_mut(trip_id).ok_or_else(not_found)?;
        let index = expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(not_found)?;
        Ok(expenses.remove(index))
    }

    /// A trip's expenses, most recent first.
    pub fn for_trip(&self, trip_id: &str) -> Vec<&Expense> {
        let mut expenses: Vec<&Expense> = self
            .by_trip
            .get(trip_id)
            .map(|list| list.iter().collect())
            .unwrap_or_default();
        expenses.sort_by_key(|e| std::cmp::Reverse(e.sort_key()));
        expenses
    }

    /// Sum of a trip's source-currency amounts.
    pub fn total(&self, trip_id: &str) -> Decimal {
        self.by_trip
            .get(trip_id)
            .map(|list| list.iter().map(|e| e.from_amount).sum())
            .unwrap_or(Decimal::ZERO)
    }

    /// Drop every expense of a trip, returning how many were removed.
    pub fn remove_trip(&mut self, trip_id: &str) -> usize {
        self.by_trip.remove(trip_id).map_or(0, |list| list.len())
    }

    pub fn trip_ids(&self) -> impl Iterator<Item = &str> {
        self.by_trip.keys().map(String::as_str)
    }
}

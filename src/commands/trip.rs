use crate::OutputFormat;
use crate::commands::{open_store, print_json};
use crate::config::Config;
use crate::expense::ExpenseLedger;
use crate::session::Session;
use crate::trip::{SortOrder, Trip, TripBook};
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use termtree::Tree;

/// Changes to an existing trip. Omitted fields keep their value.
#[derive(Args, Debug, Clone, Default)]
pub struct TripEditArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub destination: Option<String>,
    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub start: Option<NaiveDate>,
    #[arg(long, help = "End date (YYYY-MM-DD)")]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub description: Option<String>,
}

impl TripEditArgs {
    fn apply(self, trip: &mut Trip) {
        if let Some(name) = self.name {
            trip.name = name;
        }
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(start) = self.start {
            trip.start_date = Some(start);
        }
        if let Some(end) = self.end {
            trip.end_date = Some(end);
        }
        if let Some(description) = self.description {
            trip.description = description;
        }
    }
}

pub fn add(
    config: &Config,
    name: &str,
    destination: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    description: Option<String>,
) -> Result<()> {
    let store = open_store(config)?;
    let trip = Trip {
        name: name.to_string(),
        destination: destination.unwrap_or_default(),
        start_date,
        end_date,
        description: description.unwrap_or_default(),
        ..Trip::default()
    };

    let id = store.update::<TripBook, _, _>(|book| Ok(book.add(trip)?))?;
    println!("✓ Created trip '{}' ({})", name, id);
    Ok(())
}

fn date_range(trip: &Trip) -> String {
    let fmt = |d: Option<NaiveDate>| d.map_or_else(|| "?".to_string(), |d| d.to_string());
    match (trip.start_date, trip.end_date) {
        (None, None) => "no dates".to_string(),
        (start, end) => format!("{} → {}", fmt(start), fmt(end)),
    }
}

pub fn list(config: &Config, order: SortOrder, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let book = store.load::<TripBook>()?;
    let selected = store.load::<Session>()?.selected_trip_id;
    let trips = book.sorted(order);

    if let OutputFormat::Json = format {
        return print_json(&trips);
    }

    if trips.is_empty() {
        println!("No trips yet. Create one with `trip trip add <NAME>`.");
        return Ok(());
    }

    println!("{:<2} {:<15} {:<24} {:<25} Flights", "", "ID", "Name", "Dates");
    println!("{}", "-".repeat(78));
    for trip in trips {
        let marker = if selected.as_deref() == Some(trip.id.as_str()) {
            "*"
        } else {
            ""
        };
        println!(
            "{:<2} {:<15} {:<24} {:<25} {}",
            marker,
            trip.id,
            trip.name,
            date_range(trip),
            trip.flights.len()
        );
    }
    Ok(())
}

fn build_tree(trip: &Trip, expense_count: usize) -> Tree<String> {
    let mut title = trip.name.clone();
    if !trip.destination.is_empty() {
        title.push_str(&format!(" ({})", trip.destination));
    }
    let mut tree = Tree::new(title);

    let mut dates = date_range(trip);
    if let Some(days) = trip.day_count() {
        dates.push_str(&format!(", {} days", days));
    }
    tree.push(Tree::new(dates));

    if !trip.description.is_empty() {
        tree.push(Tree::new(trip.description.clone()));
    }

    let mut flights = Tree::new(format!("Flights ({})", trip.flights.len()));
    for leg in &trip.flights {
        let date = leg.date.map(|d| d.to_string()).unwrap_or_default();
        let duration = leg
            .duration
            .map_or_else(|| "--".to_string(), |d| d.to_string());
        let label = format!(
            "[{}] {} {} {} {} {} → {} ({})",
            leg.id,
            date,
            leg.airline,
            leg.flight_number,
            leg.route(),
            leg.departure_time,
            leg.arrival_time,
            duration
        );
        flights.push(Tree::new(label.split_whitespace().collect::<Vec<_>>().join(" ")));
    }
    tree.push(flights);
    tree.push(Tree::new(format!("Expenses: {}", expense_count)));
    tree
}

pub fn show(config: &Config, id: &str, format: OutputFormat) -> Result<()> {
    let store = open_store(config)?;
    let book = store.load::<TripBook>()?;
    let trip = book.get(id)?;

    match format {
        OutputFormat::Json => print_json(trip)?,
        OutputFormat::Text => {
            let ledger = store.load::<ExpenseLedger>()?;
            print!("{}", build_tree(trip, ledger.for_trip(id).len()));
        }
    }
    Ok(())
}

pub fn edit(config: &Config, id: &str, changes: TripEditArgs) -> Result<()> {
    let store = open_store(config)?;
    let name = store.update::<TripBook, _, _>(|book| {
        let mut trip = book.get(id)?.clone();
        changes.apply(&mut trip);
        let name = trip.name.clone();
        book.update(trip)?;
        Ok(name)
    })?;

    println!("✓ Updated trip '{}'", name);
    Ok(())
}

/// Delete a trip together with its expenses and any selection of it.
pub fn remove(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;

    let (trip, expenses) = store.locked(|store| {
        let mut book = store.load::<TripBook>()?;
        let trip = book.remove(id)?;

        let mut ledger = store.load::<ExpenseLedger>()?;
        let expenses = ledger.remove_trip(id);

        let mut session = store.load::<Session>()?;
        if session.selected_trip_id.as_deref() == Some(id) {
            session.selected_trip_id = None;
            store.save(&session)?;
        }

        store.save(&book)?;
        store.save(&ledger)?;
        Ok((trip, expenses))
    })?;

    tracing::debug!(trip = %trip.id, expenses, "removed trip");
    println!("✓ Deleted trip '{}' and {} expense(s)", trip.name, expenses);
    Ok(())
}

pub fn select(config: &Config, id: &str) -> Result<()> {
    let store = open_store(config)?;
    let name = store.locked(|store| {
        let book = store.load::<TripBook>()?;
        let name = book.get(id)?.name.clone();
        let mut session = store.load::<Session>()?;
        session.selected_trip_id = Some(id.to_string());
        store.save(&session)?;
        Ok(name)
    })?;

    println!("✓ Selected trip '{}'", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::models::FlightLeg;

    fn sample() -> Trip {
        Trip {
            id: "1".to_string(),
            name: "Tokyo spring".to_string(),
            destination: "Japan".to_string(),
            start_date: NaiveDate::from_ymd_opt(2027, 3, 28),
            end_date: NaiveDate::from_ymd_opt(2027, 4, 3),
            flights: vec![FlightLeg {
                id: "10".to_string(),
                flight_number: "BR198".to_string(),
                departure_city: "Taipei".to_string(),
                arrival_city: "Tokyo".to_string(),
                departure_time: "08:50".to_string(),
                arrival_time: "13:15".to_string(),
                arrival_timezone: "UTC+9 (Japan, Korea)".to_string(),
                ..FlightLeg::default()
            }],
            ..Trip::default()
        }
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range(&sample()), "2027-03-28 → 2027-04-03");
        assert_eq!(date_range(&Trip::default()), "no dates");
    }

    #[test]
    fn test_tree_lists_flights() {
        let rendered = build_tree(&sample(), 2).to_string();
        assert!(rendered.starts_with("Tokyo spring (Japan)"));
        assert!(rendered.contains("7 days"));
        assert!(rendered.contains("Flights (1)"));
        assert!(rendered.contains("BR198"));
        assert!(rendered.contains("Expenses: 2"));
    }

    #[test]
    fn test_edit_changes_only_given_fields() {
        let mut trip = sample();
        TripEditArgs {
            name: Some("Tokyo cherry blossoms".to_string()),
            end: NaiveDate::from_ymd_opt(2027, 4, 5),
            ..TripEditArgs::default()
        }
        .apply(&mut trip);

        assert_eq!(trip.name, "Tokyo cherry blossoms");
        assert_eq!(trip.destination, "Japan");
        assert_eq!(trip.start_date, NaiveDate::from_ymd_opt(2027, 3, 28));
        assert_eq!(trip.end_date, NaiveDate::from_ymd_opt(2027, 4, 5));
        assert_eq!(trip.flights.len(), 1);
    }
}

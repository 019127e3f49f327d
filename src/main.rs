use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use trip_planner::OutputFormat;
use trip_planner::commands;
use trip_planner::commands::convert::ConversionArgs;
use trip_planner::commands::flight::{FlightArgs, FlightEditArgs};
use trip_planner::commands::trip::TripEditArgs;
use trip_planner::config;
use trip_planner::error::Error;
use trip_planner::logging::{Verbosity, init_logging};
use trip_planner::trip::SortOrder;

#[derive(Parser)]
#[command(name = "trip")]
#[command(about = "Travel planner: trips, flight times, currency conversion and expenses")]
#[command(version)]
struct Cli {
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "More log output (-vv for trace)")]
    verbose: u8,
    #[arg(short, long, global = true, help = "Only log errors")]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flight durations and flight legs
    Flight(FlightCommand),
    /// Manage trips
    Trip(TripCommand),
    /// Exchange rates
    Rates(RatesCommand),
    /// Convert between TWD and another currency
    Convert(ConversionArgs),
    /// Record and list expenses of a trip
    Expense(ExpenseCommand),
    /// Export or import all trip data
    Data(DataCommand),
    /// Show configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct FlightCommand {
    #[command(subcommand)]
    action: FlightAction,
}

#[derive(Subcommand)]
enum FlightAction {
    /// Elapsed time between two local clock times
    Duration {
        #[arg(help = "Local departure time (HH:MM)")]
        departure: String,
        #[arg(help = "Local arrival time (HH:MM)")]
        arrival: String,
        #[arg(
            long = "from-tz",
            allow_negative_numbers = true,
            help = "Departure timezone label or UTC offset in hours"
        )]
        from_tz: Option<String>,
        #[arg(
            long = "to-tz",
            allow_negative_numbers = true,
            help = "Arrival timezone label or UTC offset in hours"
        )]
        to_tz: Option<String>,
    },
    /// List the selectable timezone labels
    Timezones,
    /// Add a flight leg to a trip
    Add {
        #[arg(help = "Trip ID")]
        trip_id: String,
        #[command(flatten)]
        flight: FlightArgs,
    },
    /// Change a flight leg; its duration is recomputed
    Edit {
        #[arg(help = "Trip ID")]
        trip_id: String,
        #[arg(help = "Flight ID")]
        flight_id: String,
        #[command(flatten)]
        changes: FlightEditArgs,
    },
    /// Remove a flight leg from a trip
    Remove {
        #[arg(help = "Trip ID")]
        trip_id: String,
        #[arg(help = "Flight ID")]
        flight_id: String,
    },
}

#[derive(Args)]
struct TripCommand {
    #[command(subcommand)]
    action: TripAction,
}

#[derive(Subcommand)]
enum TripAction {
    /// Create a trip
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        start: Option<NaiveDate>,
        #[arg(long, help = "End date (YYYY-MM-DD)")]
        end: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
    },
    /// List trips by start date
    List {
        #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
        order: SortOrder,
    },
    /// Show a trip with its flights
    Show {
        #[arg(help = "Trip ID")]
        id: String,
    },
    /// Change a trip's details
    Edit {
        #[arg(help = "Trip ID")]
        id: String,
        #[command(flatten)]
        changes: TripEditArgs,
    },
    /// Delete a trip and its expenses
    Remove {
        #[arg(help = "Trip ID")]
        id: String,
    },
    /// Make a trip the default for expense commands
    Select {
        #[arg(help = "Trip ID")]
        id: String,
    },
}

#[derive(Args)]
struct RatesCommand {
    #[command(subcommand)]
    action: RatesAction,
}

#[derive(Subcommand)]
enum RatesAction {
    /// Show the rates the converter uses
    Show {
        #[arg(long, help = "Ignore the cache and query the rate service")]
        refresh: bool,
    },
}

#[derive(Args)]
struct ExpenseCommand {
    #[command(subcommand)]
    action: ExpenseAction,
}

#[derive(Subcommand)]
enum ExpenseAction {
    /// Record a conversion as an expense
    Add {
        #[arg(long)]
        description: String,
        #[arg(long, help = "Expense date (YYYY-MM-DD), defaults to today")]
        date: Option<NaiveDate>,
        #[arg(long, help = "Trip ID, defaults to the selected trip")]
        trip: Option<String>,
        #[command(flatten)]
        conversion: ConversionArgs,
    },
    /// List a trip's expenses with their total
    List {
        #[arg(long, help = "Trip ID, defaults to the selected trip")]
        trip: Option<String>,
    },
    /// Delete an expense
    Remove {
        #[arg(help = "Expense ID")]
        id: String,
        #[arg(long, help = "Trip ID, defaults to the selected trip")]
        trip: Option<String>,
    },
    /// Suggested expense descriptions
    Tags,
}

#[derive(Args)]
struct DataCommand {
    #[command(subcommand)]
    action: DataAction,
}

#[derive(Subcommand)]
enum DataAction {
    /// Write trips and expenses to a JSON file
    Export { file: PathBuf },
    /// Replace trips and expenses with the contents of a JSON file
    Import { file: PathBuf },
}

#[derive(Parser)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Subcommand)]
enum ConfigAction {
    List,
    Get { key: String },
}

/// Input mistakes exit like clap's own usage errors.
const EXIT_INPUT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<Error>().is_some_and(Error::is_input_error) {
                ExitCode::from(EXIT_INPUT_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load().unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid config, using defaults: {:#}", e);
        config::Config::default()
    });
    let format = cli.format;

    match cli.command {
        Commands::Flight(flight) => match flight.action {
            FlightAction::Duration {
                departure,
                arrival,
                from_tz,
                to_tz,
            } => commands::flight::duration(&config, &departure, &arrival, from_tz, to_tz, format)?,
            FlightAction::Timezones => commands::flight::timezones(format)?,
            FlightAction::Add { trip_id, flight } => {
                commands::flight::add(&config, &trip_id, flight)?
            }
            FlightAction::Edit {
                trip_id,
                flight_id,
                changes,
            } => commands::flight::edit(&config, &trip_id, &flight_id, changes)?,
            FlightAction::Remove { trip_id, flight_id } => {
                commands::flight::remove(&config, &trip_id, &flight_id)?
            }
        },
        Commands::Trip(trip) => match trip.action {
            TripAction::Add {
                name,
                destination,
                start,
                end,
                description,
            } => commands::trip::add(&config, &name, destination, start, end, description)?,
            TripAction::List { order } => commands::trip::list(&config, order, format)?,
            TripAction::Show { id } => commands::trip::show(&config, &id, format)?,
            TripAction::Edit { id, changes } => commands::trip::edit(&config, &id, changes)?,
            TripAction::Remove { id } => commands::trip::remove(&config, &id)?,
            TripAction::Select { id } => commands::trip::select(&config, &id)?,
        },
        Commands::Rates(rates) => match rates.action {
            RatesAction::Show { refresh } => commands::rates::show(&config, refresh, format)?,
        },
        Commands::Convert(args) => commands::convert::convert(&config, &args, format)?,
        Commands::Expense(expense) => match expense.action {
            ExpenseAction::Add {
                description,
                date,
                trip,
                conversion,
            } => commands::expense::add(&config, trip, &description, date, &conversion)?,
            ExpenseAction::List { trip } => commands::expense::list(&config, trip, format)?,
            ExpenseAction::Remove { id, trip } => commands::expense::remove(&config, trip, &id)?,
            ExpenseAction::Tags => commands::expense::tags(format)?,
        },
        Commands::Data(data) => match data.action {
            DataAction::Export { file } => commands::data::export(&config, &file)?,
            DataAction::Import { file } => commands::data::import(&config, &file)?,
        },
        Commands::Config(args) => match &args.action {
            ConfigAction::List => commands::config::list(&config)?,
            ConfigAction::Get { key } => commands::config::get(key, &config)?,
        },
    }

    Ok(())
}

pub mod commands;
pub mod config;
pub mod currency;
pub mod error;
pub mod expense;
pub mod flight;
pub mod logging;
pub mod platform;
pub mod rates;
pub mod session;
pub mod store;
pub mod trip;
pub mod utils;

use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, ValueEnum, Debug, Default, Serialize)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

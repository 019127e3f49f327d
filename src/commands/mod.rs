pub mod config;
pub mod convert;
pub mod data;
pub mod expense;
pub mod flight;
pub mod rates;
pub mod trip;

use crate::config::Config;
use crate::error::Error;
use crate::rates::cache::RateCache;
use crate::rates::models::RateTable;
use crate::session::Session;
use crate::store::Store;
use crate::trip::TripBook;
use anyhow::Result;
use serde::Serialize;

pub(crate) fn open_store(config: &Config) -> Result<Store> {
    Store::open(config.storage.data_dir_override.as_ref())
}

pub(crate) fn current_rates(config: &Config, store: &Store, refresh: bool) -> RateTable {
    let cache = RateCache::in_dir(store.root());
    crate::rates::load_configured(&config.rates, &cache, refresh)
}

/// The trip named on the command line, else the selected one. Must exist.
pub(crate) fn resolve_trip_id(store: &Store, explicit: Option<String>) -> Result<String> {
    let trip_id = match explicit {
        Some(id) => id,
        None => store
            .load::<Session>()?
            .selected_trip_id
            .ok_or(Error::NoTripSelected)?,
    };
    store.load::<TripBook>()?.get(&trip_id)?;
    Ok(trip_id)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

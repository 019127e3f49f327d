//! Exchange rates for the converter.
//!
//! Rates come from the live service when possible, otherwise from the
//! last cached table, otherwise from built-in defaults. Callers always
//! get a usable table.

pub mod cache;
pub mod client;
pub mod models;
pub mod retry;

use crate::config::RatesConfig;
use crate::rates::cache::RateCache;
use crate::rates::client::RateClient;
use crate::rates::models::{BASE_CURRENCY, RateOrigin, RateTable};
use crate::rates::retry::Backoff;
use chrono::Utc;

/// Resolve the rate table to use.
///
/// A cache younger than the refresh interval is returned as is unless
/// `force_refresh` is set. Otherwise the service is queried (with retries)
/// and the result cached; on failure the cache or the defaults are used.
pub fn load_rates(
    client: &RateClient,
    cache: &RateCache,
    settings: &RatesConfig,
    force_refresh: bool,
) -> RateTable {
    let now = Utc::now();
    let cached = cache.load().unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable rate cache: {:#}", e);
        None
    });

    if !force_refresh {
        if let Some(table) = &cached {
            if table.is_fresh(now, settings.refresh_interval()) {
                tracing::debug!("using cached rates from {:?}", table.fetched_at);
                return table.clone().with_origin(RateOrigin::Cached);
            }
        }
    }

    let fetched = Backoff::from_config(settings).run(|| client.fetch_latest(BASE_CURRENCY));

    match fetched {
        Ok(latest) => {
            let table = RateTable::from_latest(&latest, now);
            if let Err(e) = cache.save(&table) {
                tracing::warn!("failed to cache rates: {:#}", e);
            }
            tracing::info!(base = %table.base, "fetched live exchange rates");
            table
        }
        Err(e) => {
            tracing::warn!("could not fetch exchange rates: {:#}", e);
            match cached {
                Some(table) => table.with_origin(RateOrigin::Cached),
                None => RateTable::defaults(),
            }
        }
    }
}

/// Build a client from configuration and resolve rates.
pub fn load_configured(
    settings: &RatesConfig,
    cache: &RateCache,
    force_refresh: bool,
) -> RateTable {
    match RateClient::new(&settings.api_url, settings.timeout()) {
        Ok(client) => load_rates(&client, cache, settings, force_refresh),
        Err(e) => {
            tracing::warn!("{:#}", e);
            cache
                .load()
                .ok()
                .flatten()
                .map(|table| table.with_origin(RateOrigin::Cached))
                .unwrap_or_else(RateTable::defaults)
        }
    }
}

use crate::commands::open_store;
use crate::config::Config;
use crate::expense::ExpenseLedger;
use crate::store::{read_document, write_document};
use crate::trip::TripBook;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Portable bundle of all trip data. Either collection may be absent on
/// import, in which case the stored one is left alone.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataBundle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trips: Option<TripBook>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<ExpenseLedger>,
    /// Collections this tool does not keep (hotels, packing lists, ...).
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignored: BTreeMap<String, serde_json::Value>,
}

impl DataBundle {
    /// Names of the collections in the file that will not be imported.
    pub fn ignored_collections(&self) -> Vec<&str> {
        self.ignored.keys().map(String::as_str).collect()
    }
}

pub fn export(config: &Config, file: &Path) -> Result<()> {
    let store = open_store(config)?;
    let bundle = store.locked(|store| {
        Ok(DataBundle {
            trips: Some(store.load::<TripBook>()?),
            expenses: Some(store.load::<ExpenseLedger>()?),
            ..DataBundle::default()
        })
    })?;

    write_document(file, &bundle)?;
    let trips = bundle.trips.as_ref().map_or(0, TripBook::len);
    println!("✓ Exported {} trip(s) to {}", trips, file.display());
    Ok(())
}

pub fn import(config: &Config, file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Import file not found: {}", file.display());
    }
    let bundle: DataBundle = read_document(file)?;
    if bundle.trips.is_none() && bundle.expenses.is_none() {
        anyhow::bail!("{} contains neither trips nor expenses", file.display());
    }
    let ignored = bundle.ignored_collections();
    if !ignored.is_empty() {
        tracing::warn!(
            "not importing {} from {}: only trips and expenses are kept",
            ignored.join(", "),
            file.display()
        );
    }

    let store = open_store(config)?;
    store.locked(|store| {
        if let Some(mut trips) = bundle.trips {
            trips.normalize();
            println!("✓ Imported {} trip(s)", trips.len());
            store.save(&trips)?;
        }
        if let Some(expenses) = bundle.expenses {
            let trips_with_expenses = expenses.trip_ids().count();
            store.save(&expenses)?;
            println!("✓ Imported expenses for {} trip(s)", trips_with_expenses);
        }
        Ok(())
    })
}

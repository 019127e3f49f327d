pub mod models;

pub use models::{SortOrder, Trip, TripBook};

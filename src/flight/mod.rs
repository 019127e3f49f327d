pub mod duration;
pub mod models;
pub mod timezone;

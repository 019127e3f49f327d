pub mod models;

pub use models::{Expense, ExpenseLedger, SUGGESTED_DESCRIPTIONS};

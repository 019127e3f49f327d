pub mod ids;
pub mod serde_compat;

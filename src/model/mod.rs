//! Database models module
//!
//! Entity structs live in models.rs; table.rs holds the typed table handle
//! the dao layer implements queries on.

mod models;
mod table;

pub use models::*;

pub use table::Table;

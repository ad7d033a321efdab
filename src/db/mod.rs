//! Database module
//!
//! SQLite storage for foods and the food log: pooled connections and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

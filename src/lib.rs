//! Nutrilog Library
//!
//! Food values, units and sizes, a food database and a food log.

pub mod build_info;
pub mod config;
pub mod db;
pub mod import;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;

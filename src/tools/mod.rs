//! Nutrilog Tools module
//!
//! MCP tool implementations for foods and the food log.

pub mod amounts;
pub mod entries;
pub mod foods;
pub mod info;

//! Record models and schema helpers for dune-mcp.
//!
//! This crate defines the canonical data model shared by the response
//! parsers, result filters, and MCP tool surface.

pub mod models;
pub mod schema;

pub use models::*;

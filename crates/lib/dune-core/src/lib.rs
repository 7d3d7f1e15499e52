//! Core services for dune-mcp.
//!
//! This crate owns the paginated fetch-and-filter engine: caller input
//! validation, the Sim HTTP transport, page schema validation, the cursor
//! loop, and the per-endpoint result filters. The control plane ties these
//! together behind one call per tool.

pub mod client;
pub mod control;
pub mod filters;
pub mod pagination;
pub mod parsers;
pub mod query;

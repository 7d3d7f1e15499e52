//! MCP tool modules.
//!
//! Sim queries live in `sim`; `args` holds the raw argument wrapper they
//! validate through.

pub mod args;
pub mod sim;

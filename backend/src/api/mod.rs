//! HTTP API handlers.

pub mod events;
pub mod mcp;

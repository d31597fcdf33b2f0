//! CLI command implementations.

pub mod bounds;
pub mod common;
pub mod config;
pub mod list;
pub mod offline;
pub mod watch;

//! Shared helpers for bundle integration tests.

pub mod commands;
pub mod loader;
pub mod transport;

pub use commands::*;
pub use loader::*;
pub use transport::*;

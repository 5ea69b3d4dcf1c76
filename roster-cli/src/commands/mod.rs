//! Command implementations for the roster CLI

pub mod migrate;
pub mod seed;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

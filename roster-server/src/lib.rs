//! roster-server: user listing page and seed procedure
//!
//! Serves an HTML page of users and their published posts from
//! PostgreSQL, and provides the idempotent seed used to populate it.

pub mod db;
pub mod http;
pub mod models;
pub mod render;
pub mod seed;

pub use db::{PgStore, RosterStore};
pub use http::{run_server, ServerConfig};
pub use seed::{seed, SeedData, Seeded};

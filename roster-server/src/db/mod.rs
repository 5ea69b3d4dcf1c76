//! Database layer - connection pool, schema, repositories and stores
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections by default)
//! - Rely on DB constraints, handle conflicts - lookup then ON CONFLICT insert
//! - Handlers talk to `RosterStore`, never to the pool directly

pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repos;
pub mod store;
#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_with_options};
pub use sqlx::PgPool;
pub use repos::*;
pub use store::{load_users_with_published_posts, PgStore, RosterStore, UserWithPosts};

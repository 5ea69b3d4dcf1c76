//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Natural-key inserts use ON CONFLICT DO NOTHING (no duplicate rows)
//! - Child rows are fetched in one query per parent set (no N+1)

pub mod users;
pub mod posts;

pub use users::{UserRepo, User, NewUser, DbError};
pub use posts::{PostRepo, Post, NewPost};

//! Domain models with validation at construction
//!
//! Seed input is validated when creating these types, before any
//! query is issued. Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod post;

pub use validation::ValidationError;
pub use user::{DisplayName, Email};
pub use post::{PostId, PostTitle};

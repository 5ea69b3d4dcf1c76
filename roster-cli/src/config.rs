//! Database connection settings shared by every command
//!
//! Values come from flags or the environment; a `.env` in the working
//! directory is loaded before parsing.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use roster_server::db::{create_pool_with_options, PgPool};

/// Connection arguments
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Seconds to wait for a connection before failing
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 10)]
    pub acquire_timeout_secs: u64,
}

impl DatabaseArgs {
    /// Open the connection pool
    pub async fn connect(&self) -> Result<PgPool> {
        create_pool_with_options(
            &self.database_url,
            self.max_connections,
            Duration::from_secs(self.acquire_timeout_secs),
        )
        .await
        .context("Failed to create database pool")
    }
}

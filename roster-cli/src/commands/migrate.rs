//! Schema setup command

use anyhow::{Context, Result};
use clap::Parser;
use roster_server::db::migrations;

use crate::config::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Create the users and posts tables if missing
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    let result = migrations::run(&pool).await;
    pool.close().await;

    result.context("Failed to run migrations")
}

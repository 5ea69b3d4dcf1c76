//! Seed command
//!
//! Ensures the sample user and post exist, prints them as JSON on
//! stdout, and always closes the pool before returning.

use anyhow::{Context, Result};
use clap::Parser;
use roster_server::{seed, PgStore, SeedData};

use crate::config::DatabaseArgs;

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    #[command(flatten)]
    pub db: DatabaseArgs,
}

/// Seed the sample user and post
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let pool = args.db.connect().await?;
    let store = PgStore::new(pool.clone());

    let result = seed(&store, &SeedData::default()).await;
    pool.close().await;

    let seeded = match result {
        Ok(seeded) => seeded,
        Err(e) => {
            tracing::error!(error = %e, "seeding failed");
            return Err(e).context("Failed to seed database");
        }
    };

    let json = serde_json::to_string_pretty(&seeded).context("Failed to serialize seed result")?;
    println!("{}", json);
    Ok(())
}

//! Generate synthetic products without touching a database
//!
//! Prints each generated product as one JSON object per line. Useful for
//! eyeballing the data before seeding a real table.
//!
//! Environment variables:
//! - NUM_RECORDS: Number of products to generate (default: 10)
//! - SEED: Optional random seed for a reproducible batch

use anyhow::{Context, Result};
use productseed::RunOptionsBuilder;
use std::env;
use std::io::{self, BufWriter, Write};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    productseed::init_tracing();

    let num_records: usize = env::var("NUM_RECORDS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .context("NUM_RECORDS must be a valid integer")?;

    let mut builder = RunOptionsBuilder::new().num_records(num_records);
    if let Ok(seed) = env::var("SEED") {
        builder = builder.seed(seed.parse().context("SEED must be a valid integer")?);
    }
    let options = builder.build();

    let products = options.synthesizer().products(options.num_records)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for product in &products {
        serde_json::to_writer(&mut out, product)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(())
}

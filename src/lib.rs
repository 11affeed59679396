//! Seed a PostgreSQL `products` table with synthetic records.
//!
//! A run ensures the table exists, generates a batch of products and
//! inserts them in one transaction, skipping any whose code is already
//! present. See [`run::connect_and_run`].

pub mod config;
pub mod error;
pub mod insert;
pub mod product;
pub mod run;
pub mod store;
pub mod synth;

pub use config::{Cli, DbParams};
pub use error::{FailureKind, RunError, StoreError, SynthError};
pub use insert::{insert_products, InsertOutcome, InsertReport};
pub use product::Product;
pub use run::{connect_and_run, run, RunSummary, Stage};
pub use store::{MemoryStore, PgStore, ProductStore, UnitOfWork};
pub use synth::ProductSynthesizer;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_NUM_RECORDS: usize = 250;

/// Install the fmt subscriber, honouring `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "productseed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub num_records: usize,
    pub seed: Option<u64>,
    pub trace_records: bool,
}

impl RunOptions {
    /// A synthesizer for one run, with a fresh uniqueness pool.
    pub fn synthesizer(&self) -> ProductSynthesizer {
        let synth = match self.seed {
            Some(seed) => ProductSynthesizer::seeded(seed),
            None => ProductSynthesizer::new(),
        };
        synth.trace(self.trace_records)
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptionsBuilder::new().build()
    }
}

pub struct RunOptionsBuilder {
    num_records: Option<usize>,
    seed: Option<u64>,
    trace_records: Option<bool>,
}

impl RunOptionsBuilder {
    pub fn new() -> Self {
        Self {
            num_records: None,
            seed: None,
            trace_records: None,
        }
    }

    pub fn num_records(mut self, num_records: usize) -> Self {
        self.num_records = Some(num_records);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn trace_records(mut self, trace_records: bool) -> Self {
        self.trace_records = Some(trace_records);
        self
    }

    pub fn build(self) -> RunOptions {
        RunOptions {
            num_records: self.num_records.unwrap_or(DEFAULT_NUM_RECORDS),
            seed: self.seed,
            trace_records: self.trace_records.unwrap_or(false),
        }
    }
}

impl Default for RunOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let options = RunOptionsBuilder::new().build();
        assert_eq!(options.num_records, 250);
        assert_eq!(options.seed, None);
        assert!(!options.trace_records);
    }

    #[test]
    fn seeded_options_repeat_their_batch() {
        let options = RunOptionsBuilder::new().seed(77).build();
        let a = options.synthesizer().products(5).unwrap();
        let b = options.synthesizer().products(5).unwrap();
        assert_eq!(a, b);
    }
}

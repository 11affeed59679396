//! One seeding run: connect, ensure the table, synthesize, insert, release.

use crate::config::DbParams;
use crate::error::RunError;
use crate::insert::{commit, write_products, InsertReport};
use crate::store::{PgStore, ProductStore};
use crate::RunOptions;
use std::fmt;
use tracing::{debug, info, warn};

/// Where a run is in its lifecycle.
///
/// `Committed` and `Aborted` both lead to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Connected,
    SchemaEnsured,
    RecordsSynthesized,
    InsertAttempted,
    Committed,
    Aborted,
    Disconnected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Connected => "connected",
            Stage::SchemaEnsured => "schema-ensured",
            Stage::RecordsSynthesized => "records-synthesized",
            Stage::InsertAttempted => "insert-attempted",
            Stage::Committed => "committed",
            Stage::Aborted => "aborted",
            Stage::Disconnected => "disconnected",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "run stage");
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub report: InsertReport,
    /// Rows in the table after commit, if it could be counted.
    pub total_rows: Option<i64>,
}

impl RunSummary {
    pub fn inserted(&self) -> u64 {
        self.report.inserted
    }
}

/// Connect to PostgreSQL with `params` and run once.
pub async fn connect_and_run(
    params: &DbParams,
    options: &RunOptions,
) -> Result<RunSummary, RunError> {
    enter(Stage::Idle);
    info!("Connecting to {}", params.display_target());
    let connect_options = params.connect_options().map_err(RunError::Connect)?;
    let store = PgStore::connect(&connect_options)
        .await
        .map_err(RunError::Connect)?;
    run(store, options).await
}

/// Run once against an already connected store.
///
/// The store is closed on every path, after success and after failure
/// alike. Close failures are logged and do not replace the run's result.
pub async fn run<S: ProductStore>(mut store: S, options: &RunOptions) -> Result<RunSummary, RunError> {
    enter(Stage::Connected);
    let result = seed(&mut store, options).await;

    if let Err(e) = &result {
        warn!(failed_after = %e.stage(), "run aborted: {e}");
        enter(Stage::Aborted);
    }

    if let Err(e) = store.close().await {
        warn!("failed to close connection: {e}");
    }
    enter(Stage::Disconnected);

    result
}

async fn seed<S: ProductStore>(store: &mut S, options: &RunOptions) -> Result<RunSummary, RunError> {
    store.ensure_schema().await.map_err(RunError::Schema)?;
    enter(Stage::SchemaEnsured);

    info!("Generating {} products...", options.num_records);
    let products = options.synthesizer().products(options.num_records)?;
    enter(Stage::RecordsSynthesized);

    let mut uow = store.begin().await.map_err(RunError::Begin)?;
    let report = write_products(uow.as_mut(), &products).await?;
    enter(Stage::InsertAttempted);

    commit(uow, &report).await?;
    enter(Stage::Committed);

    let total_rows = match store.row_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("could not count rows: {e}");
            None
        }
    };

    Ok(RunSummary { report, total_rows })
}

//! Conflict-skipping insertion of a product batch.

use crate::error::RunError;
use crate::product::Product;
use crate::store::{ProductStore, UnitOfWork};
use tracing::{debug, info};

/// What happened to a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written with this id.
    Inserted(i32),
    /// The code already existed; nothing was written.
    Skipped,
}

/// Tally of one committed batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    pub inserted: u64,
    pub skipped: u64,
}

impl InsertReport {
    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted(_) => self.inserted += 1,
            InsertOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn attempted(&self) -> u64 {
        self.inserted + self.skipped
    }
}

/// Insert `products` in order within one unit of work and commit once.
///
/// Records whose code already exists are skipped and counted as such. The
/// first failing insert aborts the batch: the unit of work is dropped
/// uncommitted, so none of this batch's rows persist.
pub async fn insert_products<S: ProductStore>(
    store: &mut S,
    products: &[Product],
) -> Result<InsertReport, RunError> {
    let mut uow = store.begin().await.map_err(RunError::Begin)?;
    let report = write_products(uow.as_mut(), products).await?;
    commit(uow, &report).await?;
    Ok(report)
}

/// Insert `products` in order into an open unit of work without committing.
///
/// Stops at the first failing insert; `position` in the error is 1-based.
pub async fn write_products(
    uow: &mut (dyn UnitOfWork + '_),
    products: &[Product],
) -> Result<InsertReport, RunError> {
    let mut report = InsertReport::default();

    for (i, product) in products.iter().enumerate() {
        let outcome = match uow.insert(product).await {
            Ok(Some(id)) => InsertOutcome::Inserted(id),
            Ok(None) => InsertOutcome::Skipped,
            Err(source) => {
                return Err(RunError::Write {
                    position: i + 1,
                    source,
                })
            }
        };
        debug!(code = %product.code, ?outcome, "insert");
        report.record(outcome);
    }

    Ok(report)
}

/// Commit a unit of work that `report` was collected from.
pub async fn commit(uow: Box<dyn UnitOfWork + '_>, report: &InsertReport) -> Result<(), RunError> {
    uow.commit().await.map_err(RunError::Commit)?;
    info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "committed product batch"
    );
    Ok(())
}

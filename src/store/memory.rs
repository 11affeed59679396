//! In-process store used for dry runs and tests.
//!
//! Clones share one table, so a test can keep a handle and inspect what a
//! run left behind after the run consumed its own copy.

use super::{ProductStore, UnitOfWork, TABLE_NAME};
use crate::error::StoreError;
use crate::product::Product;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A committed row.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub id: i32,
    pub product: Product,
}

#[derive(Debug, Default)]
struct Table {
    exists: bool,
    rows: Vec<StoredProduct>,
    // Like a SERIAL sequence, ids handed to rolled back rows are not reused.
    last_id: i32,
    closed: bool,
}

impl Table {
    fn has_code(&self, code: &str) -> bool {
        self.rows.iter().any(|row| row.product.code == code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    table: Arc<Mutex<Table>>,
    fail_on_insert: Option<usize>,
    fail_on_commit: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `attempt`-th insert (1-based) of every unit of work.
    pub fn fail_on_insert(mut self, attempt: usize) -> Self {
        self.fail_on_insert = Some(attempt);
        self
    }

    /// Reject every commit; the staged rows are discarded.
    pub fn fail_on_commit(mut self) -> Self {
        self.fail_on_commit = true;
        self
    }

    pub async fn rows(&self) -> Vec<StoredProduct> {
        self.table.lock().await.rows.clone()
    }

    pub async fn table_exists(&self) -> bool {
        self.table.lock().await.exists
    }

    /// Whether some handle to this table has been closed.
    pub async fn is_closed(&self) -> bool {
        self.table.lock().await.closed
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        self.table.lock().await.exists = true;
        Ok(())
    }

    async fn begin<'a>(&'a mut self) -> Result<Box<dyn UnitOfWork + 'a>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork {
            table: Arc::clone(&self.table),
            staged: Vec::new(),
            attempts: 0,
            fail_on_insert: self.fail_on_insert,
            fail_on_commit: self.fail_on_commit,
        }))
    }

    async fn row_count(&mut self) -> Result<i64, StoreError> {
        let table = self.table.lock().await;
        if !table.exists {
            return Err(StoreError::MissingTable(TABLE_NAME));
        }
        Ok(table.rows.len() as i64)
    }

    async fn close(self) -> Result<(), StoreError> {
        self.table.lock().await.closed = true;
        Ok(())
    }
}

struct MemoryUnitOfWork {
    table: Arc<Mutex<Table>>,
    staged: Vec<StoredProduct>,
    attempts: usize,
    fail_on_insert: Option<usize>,
    fail_on_commit: bool,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert(&mut self, product: &Product) -> Result<Option<i32>, StoreError> {
        self.attempts += 1;
        let mut table = self.table.lock().await;

        if !table.exists {
            return Err(StoreError::MissingTable(TABLE_NAME));
        }
        if self.fail_on_insert == Some(self.attempts) {
            return Err(StoreError::Rejected {
                code: product.code.clone(),
                reason: format!("injected failure on insert #{}", self.attempts),
            });
        }
        if table.has_code(&product.code)
            || self.staged.iter().any(|row| row.product.code == product.code)
        {
            return Ok(None);
        }

        table.last_id += 1;
        let id = table.last_id;
        self.staged.push(StoredProduct {
            id,
            product: product.clone(),
        });
        Ok(Some(id))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        if this.fail_on_commit {
            return Err(StoreError::CommitRejected(format!(
                "injected failure with {} staged rows",
                this.staged.len()
            )));
        }
        this.table.lock().await.rows.extend(this.staged);
        Ok(())
    }
}

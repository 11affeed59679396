//! Where products get written.
//!
//! A [`ProductStore`] owns one exclusive connection for the duration of a
//! run. Inserts happen inside a [`UnitOfWork`]; nothing a unit of work wrote
//! is visible until [`UnitOfWork::commit`], and dropping it uncommitted
//! discards its writes.

mod memory;
mod postgres;

pub use memory::{MemoryStore, StoredProduct};
pub use postgres::{PgStore, CREATE_TABLE_SQL, INSERT_PRODUCT_SQL, TABLE_NAME};

use crate::error::StoreError;
use crate::product::Product;
use async_trait::async_trait;

#[async_trait]
pub trait ProductStore: Send {
    /// Create the `products` table unless it already exists.
    async fn ensure_schema(&mut self) -> Result<(), StoreError>;

    /// Open a unit of work on this store's connection.
    async fn begin<'a>(&'a mut self) -> Result<Box<dyn UnitOfWork + 'a>, StoreError>;

    /// Number of committed rows in `products`.
    async fn row_count(&mut self) -> Result<i64, StoreError>;

    /// Release the connection.
    async fn close(self) -> Result<(), StoreError>
    where
        Self: Sized;
}

#[async_trait]
pub trait UnitOfWork: Send {
    /// Insert `product` unless its code already exists.
    ///
    /// Returns the generated id, or `None` when the code was taken.
    async fn insert(&mut self, product: &Product) -> Result<Option<i32>, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

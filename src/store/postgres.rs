//! PostgreSQL-backed store over a single `PgConnection`.

use super::{ProductStore, UnitOfWork};
use crate::error::StoreError;
use crate::product::Product;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection, Postgres, Transaction};
use tracing::debug;

pub const TABLE_NAME: &str = "products";

pub const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS products (
    id SERIAL PRIMARY KEY,
    code VARCHAR(50) UNIQUE,
    name VARCHAR(100),
    description TEXT,
    price DECIMAL(10, 2),
    category VARCHAR(50),
    stock INTEGER,
    creation_date DATE,
    company VARCHAR(100),
    company_email VARCHAR(100),
    origin_country VARCHAR(2)
)";

/// Returns the new id, or no row when `code` is already taken.
pub const INSERT_PRODUCT_SQL: &str = "
INSERT INTO products (code, name, description, price, category, stock, creation_date, company, company_email, origin_country)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
ON CONFLICT (code) DO NOTHING
RETURNING id";

pub struct PgStore {
    conn: PgConnection,
}

impl PgStore {
    pub async fn connect(options: &PgConnectOptions) -> Result<Self, StoreError> {
        let conn = PgConnection::connect_with(options).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn ensure_schema(&mut self) -> Result<(), StoreError> {
        debug!("DDL: {}", CREATE_TABLE_SQL);
        sqlx::query(CREATE_TABLE_SQL).execute(&mut self.conn).await?;
        Ok(())
    }

    async fn begin<'a>(&'a mut self) -> Result<Box<dyn UnitOfWork + 'a>, StoreError> {
        let tx = self.conn.begin().await?;
        Ok(Box::new(tx))
    }

    async fn row_count(&mut self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count)
    }

    async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl<'c> UnitOfWork for Transaction<'c, Postgres> {
    async fn insert(&mut self, product: &Product) -> Result<Option<i32>, StoreError> {
        let row: Option<(i32,)> = sqlx::query_as(INSERT_PRODUCT_SQL)
            .bind(&product.code)
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.stock)
            .bind(product.creation_date)
            .bind(&product.company)
            .bind(&product.company_email)
            .bind(&product.origin_country)
            .fetch_optional(&mut *self)
            .await?;

        Ok(row.map(|(id,)| id))
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        Transaction::commit(*self).await?;
        Ok(())
    }
}

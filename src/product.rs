use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// A synthetic product, as written to the `products` table.
///
/// `id` is not part of the record; the store assigns it on insert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    /// 13-digit EAN code, unique across the table.
    pub code: String,
    pub name: String,
    pub description: String,
    /// Two fractional digits, in `[10, 1000)`.
    pub price: Decimal,
    pub category: String,
    pub stock: i32,
    pub creation_date: NaiveDate,
    pub company: String,
    pub company_email: String,
    /// ISO 3166-1 alpha-2.
    pub origin_country: String,
}

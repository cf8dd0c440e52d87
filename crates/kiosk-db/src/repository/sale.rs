//! # Sale Repository
//!
//! Reads over committed sales, plus the row writes that checkout composes
//! into its transaction.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. HEADER                                                             │
//! │     └── insert_header() → sales row, total_cents = 0                   │
//! │                                                                         │
//! │  2. LINES (cart order)                                                 │
//! │     └── insert_line_item() → sale_line_items row                       │
//! │     └── insert_line_item() → sale_line_items row                       │
//! │                                                                         │
//! │  3. TOTAL                                                              │
//! │     └── update_total() → sales.total_cents = Σ subtotal_cents          │
//! │                                                                         │
//! │  4. COMMIT (checkout.rs) → visible to get_by_id / list_recent          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sales are never edited or deleted after commit.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kiosk_core::validation::validate_report_limit;
use kiosk_core::{CartEntry, Discount, LineItemDetail, Money, Sale, SaleLineItem, SaleSummary};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, created_at, cashier_id, discount_bps, total_cents
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Raw line rows of a sale in the order they were written.
    pub async fn list_items(&self, sale_id: i64) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, subtotal_cents
            FROM sale_line_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Receipt lines: each line with its product's name, in cart order.
    ///
    /// An unknown sale and a sale with no lines both give `Ok(vec![])`.
    pub async fn get_line_items(&self, sale_id: i64) -> DbResult<Vec<LineItemDetail>> {
        debug!(sale_id, "Loading receipt lines");

        let lines = sqlx::query_as::<_, LineItemDetail>(
            r#"
            SELECT
                li.id,
                p.name AS product_name,
                li.quantity,
                li.subtotal_cents
            FROM sale_line_items li
            JOIN products p ON p.id = li.product_id
            WHERE li.sale_id = ?1
            ORDER BY li.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Sales report: the `limit` most recent sales, newest first.
    ///
    /// `limit` must be in `1..=500`
    /// ([`DEFAULT_REPORT_LIMIT`](kiosk_core::DEFAULT_REPORT_LIMIT) is the
    /// usual choice) and is bound, never spliced into the statement.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleSummary>> {
        validate_report_limit(limit)?;
        debug!(limit, "Listing recent sales");

        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT
                s.id,
                s.created_at,
                u.username AS cashier,
                s.total_cents,
                s.discount_bps
            FROM sales s
            JOIN users u ON u.id = s.cashier_id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Writes
// =============================================================================

/// Inserts the header with a zero total and returns the new sale id.
pub(crate) async fn insert_header(
    conn: &mut SqliteConnection,
    cashier_id: i64,
    discount: Discount,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO sales (created_at, cashier_id, discount_bps, total_cents)
        VALUES (?1, ?2, ?3, 0)
        "#,
    )
    .bind(Utc::now())
    .bind(cashier_id)
    .bind(discount.bps())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Writes one line for `entry` with its precomputed subtotal.
pub(crate) async fn insert_line_item(
    conn: &mut SqliteConnection,
    sale_id: i64,
    entry: &CartEntry,
    subtotal: Money,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO sale_line_items (sale_id, product_id, quantity, subtotal_cents)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(sale_id)
    .bind(entry.product_id)
    .bind(entry.quantity)
    .bind(subtotal.cents())
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub(crate) async fn update_total(
    conn: &mut SqliteConnection,
    sale_id: i64,
    total: Money,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE sales SET total_cents = ?1 WHERE id = ?2")
        .bind(total.cents())
        .bind(sale_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

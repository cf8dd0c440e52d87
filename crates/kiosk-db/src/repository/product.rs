//! # Product Repository
//!
//! Catalog reads, product creation and the stock form.
//!
//! ## Stock Writers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Stock form     ──► set_stock(id, n)        quantity = n               │
//! │  Delivery       ──► adjust_stock(id, +d)    quantity = quantity + d    │
//! │  Checkout       ──► decrement_stock(conn)   quantity = quantity - q    │
//! │                     (inside the sale transaction, see checkout.rs)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kiosk_core::validation::{validate_price_cents, validate_product_name, validate_stock};
use kiosk_core::{NewProduct, Product, ValidationError};

const PRODUCT_COLUMNS: &str = "id, name, supplier_id, quantity, unit_price_cents";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Adds a product (admin ABM form) and returns its id.
    ///
    /// ## Errors
    /// * `DbError::Validation` - empty name, negative stock or price
    /// * `DbError::ForeignKeyViolation` - supplier doesn't exist
    pub async fn create(&self, product: &NewProduct) -> DbResult<i64> {
        validate_product_name(&product.name)?;
        validate_stock(product.quantity)?;
        validate_price_cents(product.unit_price_cents)?;

        debug!(name = %product.name, supplier_id = product.supplier_id, "Creating product");

        let id = sqlx::query(
            r#"
            INSERT INTO products (name, supplier_id, quantity, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(product.name.trim())
        .bind(product.supplier_id)
        .bind(product.quantity)
        .bind(product.unit_price_cents)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(id)
    }

    /// The whole catalog ordered by id. This is what the sale form loads
    /// to build carts.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Overwrites the stock level (stock form).
    ///
    /// ## Returns
    /// * `Ok(())` - Stock updated
    /// * `Err(DbError::Validation)` - Negative quantity
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn set_stock(&self, id: i64, quantity: i64) -> DbResult<()> {
        validate_stock(quantity)?;
        debug!(id, quantity, "Setting stock");

        let result = sqlx::query("UPDATE products SET quantity = ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Adds `delta` (positive or negative) to the stock level and returns
    /// the new level. Refuses to take stock below zero.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> DbResult<i64> {
        debug!(id, delta, "Adjusting stock");

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET quantity = quantity + ?1
            WHERE id = ?2 AND quantity + ?1 >= 0
            RETURNING quantity
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(quantity) => Ok(quantity),
            None if self.get_by_id(id).await?.is_some() => {
                Err(DbError::Validation(ValidationError::MustNotBeNegative {
                    field: "stock".to_string(),
                }))
            }
            None => Err(DbError::not_found("Product", id)),
        }
    }

    /// Counts products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction Writes
// =============================================================================
// These take the caller's connection so checkout can run them inside its
// own transaction. Errors stay as sqlx::Error for the caller to attribute.

/// Takes `quantity` units off the shelf, whatever the current level.
/// Returns the number of rows touched (0 when the product is unknown).
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE products SET quantity = quantity - ?1 WHERE id = ?2")
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Like [`decrement_stock`], but touches nothing when fewer than
/// `quantity` units are left.
pub(crate) async fn decrement_stock_if_available(
    conn: &mut SqliteConnection,
    product_id: i64,
    quantity: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products SET quantity = quantity - ?1 WHERE id = ?2 AND quantity >= ?1",
    )
    .bind(quantity)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

/// Current stock as seen by `conn`, `None` for an unknown product.
pub(crate) async fn stock_level(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use kiosk_core::NewProduct;

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let supplier_id = db.suppliers().create("Arcor").await.unwrap();
        (db, supplier_id)
    }

    fn alfajor(supplier_id: i64) -> NewProduct {
        NewProduct {
            name: "Alfajor".to_string(),
            supplier_id,
            quantity: 10,
            unit_price_cents: 250,
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let (db, supplier_id) = setup().await;
        let products = db.products();

        assert!(products.list().await.unwrap().is_empty());

        let id = products.create(&alfajor(supplier_id)).await.unwrap();
        let list = products.list().await.unwrap();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, id);
        assert_eq!(list[0].unit_price_cents, 250);
        assert_eq!(products.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_supplier() {
        let (db, supplier_id) = setup().await;

        let err = db
            .products()
            .create(&alfajor(supplier_id + 100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }), "got {err}");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let (db, supplier_id) = setup().await;

        let mut product = alfajor(supplier_id);
        product.unit_price_cents = -1;
        assert!(matches!(
            db.products().create(&product).await,
            Err(DbError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_set_stock() {
        let (db, supplier_id) = setup().await;
        let products = db.products();
        let id = products.create(&alfajor(supplier_id)).await.unwrap();

        products.set_stock(id, 42).await.unwrap();
        assert_eq!(products.get_by_id(id).await.unwrap().unwrap().quantity, 42);

        assert!(matches!(
            products.set_stock(id, -1).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            products.set_stock(id + 1, 5).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let (db, supplier_id) = setup().await;
        let products = db.products();
        let id = products.create(&alfajor(supplier_id)).await.unwrap();

        assert_eq!(products.adjust_stock(id, 5).await.unwrap(), 15);
        assert_eq!(products.adjust_stock(id, -15).await.unwrap(), 0);

        assert!(matches!(
            products.adjust_stock(id, -1).await,
            Err(DbError::Validation(_))
        ));
        assert!(matches!(
            products.adjust_stock(id + 1, 1).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(products.get_by_id(id).await.unwrap().unwrap().quantity, 0);
    }
}

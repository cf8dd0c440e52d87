//! # Checkout
//!
//! Turns a confirmed cart into a committed sale, all or nothing.
//!
//! ## Transaction Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    process_sale(cashier_id, cart, discount)             │
//! │                                                                         │
//! │  validate every entry            ── nothing written yet                 │
//! │       │                                                                 │
//! │  BEGIN  (one pooled connection held until the end)                     │
//! │       │                                                                 │
//! │  1. INSERT sales (total 0)      ──► sale_id                            │
//! │  2. for entry in cart (in order):                                      │
//! │       INSERT sale_line_items    ──► subtotal; total += subtotal        │
//! │       UPDATE products.quantity -= entry.quantity                       │
//! │  3. UPDATE sales.total_cents = total                                   │
//! │  4. COMMIT                      ──► Ok(sale_id)                        │
//! │                                                                         │
//! │  any error in 1-4 ──► ROLLBACK ──► Err(CheckoutError)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Other sessions see either the whole sale or none of it. The discount is
//! stored on the header as given; the total is always the raw sum of the
//! line subtotals.
//!
//! Two sales of the same product race on its stock under the default
//! [`StockPolicy::Unchecked`] and can take it below zero. SQLite serializes
//! the writers, so each decrement itself is never lost.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::error::{CheckoutError, CheckoutStep, DbError};
use crate::repository::{product, sale};
use kiosk_core::{CartEntry, CashierSession, CoreError, Discount, Money, ValidationError};

/// What checkout does about stock running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockPolicy {
    /// Decrement whatever the level; stock may go negative. Sufficiency is
    /// the sale form's job (see [`kiosk_core::Cart::check_stock`]).
    #[default]
    Unchecked,
    /// Only decrement when enough units remain, otherwise fail the sale
    /// with [`CoreError::InsufficientStock`].
    RejectNegative,
}

impl StockPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockPolicy::Unchecked => "unchecked",
            StockPolicy::RejectNegative => "reject-negative",
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unchecked" => Ok(StockPolicy::Unchecked),
            "reject-negative" => Ok(StockPolicy::RejectNegative),
            _ => Err(ValidationError::NotAllowed {
                field: "stock policy".to_string(),
                allowed: vec!["unchecked".to_string(), "reject-negative".to_string()],
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub stock_policy: StockPolicy,
}

impl CheckoutOptions {
    pub fn stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }
}

/// The sale-transaction orchestrator. Get one from
/// [`Database::checkout`](crate::Database::checkout).
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
    options: CheckoutOptions,
}

impl Checkout {
    pub fn new(pool: SqlitePool) -> Self {
        Checkout::with_options(pool, CheckoutOptions::default())
    }

    pub fn with_options(pool: SqlitePool, options: CheckoutOptions) -> Self {
        Checkout { pool, options }
    }

    pub fn options(&self) -> CheckoutOptions {
        self.options
    }

    /// Records a sale for `cashier_id` and returns the new sale id.
    ///
    /// ## Arguments
    /// * `cashier_id` - An existing user; enforced by the foreign key only
    /// * `cart` - Lines in the order they are written; may be empty
    /// * `discount` - Stored on the header, not subtracted from the total
    ///
    /// ## Errors
    /// * `CheckoutError::InvalidEntry` - a line failed validation, nothing started
    /// * `CheckoutError::Connection` - no transaction could be opened
    /// * `CheckoutError::Statement` - a write failed, rolled back
    /// * `CheckoutError::Rejected` - unknown product, stock guard or an
    ///   amount out of range, rolled back
    pub async fn process_sale(
        &self,
        cashier_id: i64,
        cart: &[CartEntry],
        discount: Discount,
    ) -> Result<i64, CheckoutError> {
        for (position, entry) in cart.iter().enumerate() {
            if let Err(source) = entry.validate() {
                warn!(cashier_id, position, error = %source, "Cart entry rejected");
                return Err(CheckoutError::InvalidEntry { position, source });
            }
        }

        info!(
            cashier_id,
            items = cart.len(),
            discount_bps = discount.bps(),
            policy = %self.options.stock_policy,
            "Starting checkout"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CheckoutError::Connection(e.into()))?;

        let (sale_id, total) = match self.write_sale(&mut *tx, cashier_id, cart, discount).await {
            Ok(written) => written,
            Err(err) => {
                warn!(cashier_id, error = %err, "Checkout failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    // The connection is discarded, so the writes are lost anyway
                    error!(error = %rollback_err, "Rollback failed");
                }
                return Err(err);
            }
        };

        // A failed commit leaves nothing behind: the transaction is dropped
        // and SQLite rolls it back.
        tx.commit()
            .await
            .map_err(CheckoutError::at(CheckoutStep::Commit))?;

        info!(
            sale_id,
            cashier_id,
            items = cart.len(),
            total_cents = total.cents(),
            "Sale committed"
        );

        Ok(sale_id)
    }

    /// [`process_sale`](Self::process_sale) for the logged-in cashier.
    pub async fn process_session_sale(
        &self,
        session: &CashierSession,
        cart: &[CartEntry],
        discount: Discount,
    ) -> Result<i64, CheckoutError> {
        self.process_sale(session.user_id, cart, discount).await
    }

    /// Steps 1-3, on the transaction's connection.
    async fn write_sale(
        &self,
        conn: &mut SqliteConnection,
        cashier_id: i64,
        cart: &[CartEntry],
        discount: Discount,
    ) -> Result<(i64, Money), CheckoutError> {
        let sale_id = sale::insert_header(conn, cashier_id, discount)
            .await
            .map_err(CheckoutError::at(CheckoutStep::SaleHeader))?;
        debug!(sale_id, "Sale header inserted");

        let mut total = Money::zero();

        for (position, entry) in cart.iter().enumerate() {
            let subtotal = entry.checked_subtotal().map_err(CheckoutError::Rejected)?;

            sale::insert_line_item(conn, sale_id, entry, subtotal)
                .await
                .map_err(CheckoutError::at(CheckoutStep::LineItem {
                    position,
                    product_id: entry.product_id,
                }))?;

            total = total.checked_add(subtotal).ok_or_else(|| {
                CheckoutError::Rejected(CoreError::AmountOutOfRange {
                    what: format!("total of sale {sale_id}"),
                })
            })?;

            self.take_stock(conn, entry).await?;

            debug!(
                sale_id,
                product_id = entry.product_id,
                quantity = entry.quantity,
                subtotal_cents = subtotal.cents(),
                "Line written"
            );
        }

        let updated = sale::update_total(conn, sale_id, total)
            .await
            .map_err(CheckoutError::at(CheckoutStep::Total))?;
        if updated != 1 {
            return Err(CheckoutError::Statement {
                step: CheckoutStep::Total,
                source: DbError::not_found("Sale", sale_id),
            });
        }

        Ok((sale_id, total))
    }

    async fn take_stock(
        &self,
        conn: &mut SqliteConnection,
        entry: &CartEntry,
    ) -> Result<(), CheckoutError> {
        let step = CheckoutStep::StockDecrement {
            product_id: entry.product_id,
        };

        let touched = match self.options.stock_policy {
            StockPolicy::Unchecked => {
                product::decrement_stock(conn, entry.product_id, entry.quantity)
                    .await
                    .map_err(CheckoutError::at(step))?
            }
            StockPolicy::RejectNegative => {
                product::decrement_stock_if_available(conn, entry.product_id, entry.quantity)
                    .await
                    .map_err(CheckoutError::at(step))?
            }
        };

        if touched > 0 {
            return Ok(());
        }

        let available = product::stock_level(conn, entry.product_id)
            .await
            .map_err(CheckoutError::at(step))?;

        Err(CheckoutError::Rejected(match available {
            None => CoreError::ProductNotFound(entry.product_id),
            Some(available) => CoreError::InsufficientStock {
                product_id: entry.product_id,
                available,
                requested: entry.quantity,
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kiosk_core::{NewProduct, NewUser, Role};

    struct Fixture {
        db: Database,
        cashier: i64,
        alfajor: i64,
        soda: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cashier = db
            .users()
            .create(&NewUser {
                username: "ana".to_string(),
                password: "secret".to_string(),
                role: Role::Employee,
            })
            .await
            .unwrap();
        let supplier_id = db.suppliers().create("Arcor").await.unwrap();
        let alfajor = add_product(&db, supplier_id, "Alfajor", 10, 250).await;
        let soda = add_product(&db, supplier_id, "Coca-Cola 500ml", 5, 1000).await;

        Fixture {
            db,
            cashier,
            alfajor,
            soda,
        }
    }

    async fn add_product(db: &Database, supplier_id: i64, name: &str, quantity: i64, price: i64) -> i64 {
        db.products()
            .create(&NewProduct {
                name: name.to_string(),
                supplier_id,
                quantity,
                unit_price_cents: price,
            })
            .await
            .unwrap()
    }

    async fn stock(db: &Database, id: i64) -> i64 {
        db.products().get_by_id(id).await.unwrap().unwrap().quantity
    }

    #[test]
    fn test_stock_policy_parsing() {
        assert_eq!(StockPolicy::default(), StockPolicy::Unchecked);
        assert_eq!(
            "reject-negative".parse::<StockPolicy>().unwrap(),
            StockPolicy::RejectNegative
        );
        assert!("strict".parse::<StockPolicy>().is_err());
        assert_eq!(StockPolicy::RejectNegative.to_string(), "reject-negative");
    }

    #[tokio::test]
    async fn test_sale_is_written_in_cart_order() {
        let f = fixture().await;
        let cart = vec![
            CartEntry::new(f.soda, Money::from_cents(1000), 1),
            CartEntry::new(f.alfajor, Money::from_cents(250), 3),
        ];

        let sale_id = f
            .db
            .checkout()
            .process_sale(f.cashier, &cart, Discount::none())
            .await
            .unwrap();

        let items = f.db.sales().list_items(sale_id).await.unwrap();
        let order: Vec<i64> = items.iter().map(|i| i.product_id).collect();
        assert_eq!(order, vec![f.soda, f.alfajor]);

        let sale = f.db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 1750);
        assert_eq!(sale.cashier_id, f.cashier);
    }

    #[tokio::test]
    async fn test_invalid_entry_is_rejected_before_any_write() {
        let f = fixture().await;
        let cart = vec![
            CartEntry::new(f.alfajor, Money::from_cents(250), 1),
            CartEntry::new(f.soda, Money::from_cents(1000), 0),
        ];

        let err = f
            .db
            .checkout()
            .process_sale(f.cashier, &cart, Discount::none())
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::InvalidEntry { position: 1, .. }));
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
        assert_eq!(stock(&f.db, f.alfajor).await, 10);
    }

    #[tokio::test]
    async fn test_unknown_cashier_rolls_back() {
        let f = fixture().await;
        let cart = vec![CartEntry::new(f.alfajor, Money::from_cents(250), 1)];

        let err = f
            .db
            .checkout()
            .process_sale(f.cashier + 99, &cart, Discount::none())
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(CheckoutStep::SaleHeader));
        assert!(matches!(
            err,
            CheckoutError::Statement {
                source: DbError::ForeignKeyViolation { .. },
                ..
            }
        ));
        assert_eq!(stock(&f.db, f.alfajor).await, 10);
    }

    #[tokio::test]
    async fn test_unchecked_policy_allows_negative_stock() {
        let f = fixture().await;
        let cart = vec![CartEntry::new(f.soda, Money::from_cents(1000), 7)];

        f.db.checkout()
            .process_sale(f.cashier, &cart, Discount::none())
            .await
            .unwrap();

        assert_eq!(stock(&f.db, f.soda).await, -2);
    }

    #[tokio::test]
    async fn test_reject_negative_policy() {
        let f = fixture().await;
        let checkout = f
            .db
            .checkout_with(CheckoutOptions::default().stock_policy(StockPolicy::RejectNegative));
        let cart = vec![
            CartEntry::new(f.alfajor, Money::from_cents(250), 2),
            CartEntry::new(f.soda, Money::from_cents(1000), 6),
        ];

        let err = checkout
            .process_sale(f.cashier, &cart, Discount::none())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            })
        ));
        assert_eq!(stock(&f.db, f.alfajor).await, 10);
        assert_eq!(stock(&f.db, f.soda).await, 5);
        assert_eq!(f.db.sales().count().await.unwrap(), 0);

        let exact = vec![CartEntry::new(f.soda, Money::from_cents(1000), 5)];
        checkout
            .process_sale(f.cashier, &exact, Discount::none())
            .await
            .unwrap();
        assert_eq!(stock(&f.db, f.soda).await, 0);
    }

    #[tokio::test]
    async fn test_total_overflow_is_rejected_inside_the_transaction() {
        let f = fixture().await;
        let checkout = f.db.checkout();
        let half = Money::from_cents(i64::MAX / 2 + 1);
        let cart = vec![
            CartEntry::new(f.alfajor, half, 1),
            CartEntry::new(f.soda, half, 1),
        ];

        // Skips the up-front price check to reach the running total
        let mut tx = f.db.pool().begin().await.unwrap();
        let err = checkout
            .write_sale(&mut *tx, f.cashier, &cart, Discount::none())
            .await
            .unwrap_err();
        tx.rollback().await.unwrap();

        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::AmountOutOfRange { .. })
        ));
        assert_eq!(f.db.sales().count().await.unwrap(), 0);
        assert_eq!(stock(&f.db, f.alfajor).await, 10);
    }

    #[tokio::test]
    async fn test_session_sale_uses_session_user() {
        let f = fixture().await;
        let session = f.db.users().login("ana", "secret").await.unwrap().unwrap();

        let sale_id = f
            .db
            .checkout()
            .process_session_sale(&session, &[], Discount::none())
            .await
            .unwrap();

        let sale = f.db.sales().get_by_id(sale_id).await.unwrap().unwrap();
        assert_eq!(sale.cashier_id, f.cashier);
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_connection_error() {
        let f = fixture().await;
        f.db.close().await;

        let err = f
            .db
            .checkout()
            .process_sale(f.cashier, &[], Discount::none())
            .await
            .unwrap_err();

        match err {
            CheckoutError::Connection(source) => assert!(source.is_connection()),
            other => panic!("unexpected error: {other}"),
        }
    }
}

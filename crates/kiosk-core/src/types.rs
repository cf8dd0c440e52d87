//! # Domain Types
//!
//! Entity types persisted by the kiosk.
//!
//! ## Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Supplier 1 ──── * Product                                              │
//! │                       │                                                 │
//! │                       │ referenced by                                   │
//! │                       ▼                                                 │
//! │  User 1 ──── * Sale 1 ──── * SaleLineItem                               │
//! │  (cashier)     (ticket)      (product, qty, subtotal)                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are database-assigned integers. Money columns are integer
//! cents; accessors wrap them in [`Money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::{Discount, Money};

// =============================================================================
// Role
// =============================================================================

/// What a user may do at the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can sell, adjust stock, manage users/suppliers/products and see reports.
    Admin,
    /// Can sell and adjust stock.
    Employee,
}

impl Role {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

// =============================================================================
// User
// =============================================================================

/// A kiosk account. The password never leaves the users table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// Fields for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    /// Stored as given.
    pub password: String,
    pub role: Role,
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product on the shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    pub supplier_id: i64,

    /// Units in stock. Sales decrement it; the stock form overwrites it.
    pub quantity: i64,

    /// Current shelf price in cents.
    pub unit_price_cents: i64,
}

impl Product {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Whether `quantity` units can be sold without going below zero.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub supplier_id: i64,
    /// Initial stock.
    pub quantity: i64,
    pub unit_price_cents: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale header (the ticket).
///
/// `total_cents` is the raw sum of the line subtotals. The discount is
/// recorded alongside and is never subtracted from the stored total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub cashier_id: i64,
    pub discount_bps: u32,
    pub total_cents: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Stored discount. Out-of-range values saturate to 100%.
    pub fn discount(&self) -> Discount {
        Discount::from_bps(self.discount_bps.min(Discount::MAX_BPS)).unwrap_or_default()
    }

    /// Total with the header discount taken off, for layers that want to
    /// show it. Nothing persisted depends on this value.
    pub fn total_after_discount(&self) -> Money {
        self.total().apply_discount(self.discount())
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product line of a sale. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// `quantity × unit price` at the time of sale.
    pub subtotal_cents: i64,
}

impl SaleLineItem {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// A receipt line: the line item joined with its product's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LineItemDetail {
    pub id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal_cents: i64,
}

/// A row of the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleSummary {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    /// Username of the cashier.
    pub cashier: String,
    pub total_cents: i64,
    pub discount_bps: u32,
}

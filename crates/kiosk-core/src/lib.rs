//! # kiosk-core: Pure Business Logic for the Kiosk POS
//!
//! Domain types and rules with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kiosk POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Presentation (login, cart, stock, ABM, reports)        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kiosk-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  session  │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │  Cashier  │  │   │
//! │  │   │   Sale    │  │ Discount  │  │ CartEntry │  │  Session  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kiosk-db (Database Layer)                    │   │
//! │  │        SQLite queries, migrations, repositories, checkout       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entity types (User, Supplier, Product, Sale, line items)
//! - [`money`] - Money type with integer arithmetic, and the sale discount
//! - [`cart`] - Client-side cart accumulated before checkout
//! - [`session`] - The logged-in cashier context passed into checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kiosk_core::money::{Discount, Money};
//!
//! let price = Money::from_cents(250); // $2.50
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 750);
//!
//! let discount = Discount::from_fraction(0.1).unwrap();
//! assert_eq!(discount.bps(), 1000);
//! ```

pub mod cart;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartEntry};
pub use error::{CoreError, ValidationError};
pub use money::{Discount, Money};
pub use session::CashierSession;
pub use types::*;

/// Maximum distinct products allowed in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single product in one cart entry.
///
/// Guards against typing 1000 instead of 10 at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in cents ($100,000,000.00).
///
/// Keeps `price × MAX_ITEM_QUANTITY` far inside i64.
pub const MAX_UNIT_PRICE_CENTS: i64 = 10_000_000_000;

/// Number of rows the sales report shows when the caller doesn't say.
pub const DEFAULT_REPORT_LIMIT: u32 = 20;

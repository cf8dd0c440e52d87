//! # kiosk-db: Database Layer for the Kiosk POS
//!
//! Database access on SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kiosk POS Data Flow                              │
//! │                                                                         │
//! │  Presentation (sale form, stock form, ABM, reports)                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kiosk-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌──────────────┐   ┌───────────────────────┐ │   │
//! │  │   │ Database  │   │ Repositories │   │ Checkout              │ │   │
//! │  │   │ (pool.rs) │◄──│ users        │   │ one transaction:      │ │   │
//! │  │   │ DbConfig  │   │ suppliers    │   │ header, lines, stock, │ │   │
//! │  │   │ (config)  │   │ products     │   │ total, commit         │ │   │
//! │  │   │           │   │ sales        │   │                       │ │   │
//! │  │   └───────────┘   └──────────────┘   └───────────────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL, foreign keys on)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Connection settings, from code or environment
//! - [`pool`] - Connection pool and repository access
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Single-statement accessors per table
//! - [`checkout`] - The atomic sale transaction
//! - [`error`] - Database and checkout error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiosk_core::{Cart, Discount};
//! use kiosk_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let session = db.users().login("ana", "secret").await?.expect("bad login");
//! let catalog = db.products().list().await?;
//!
//! let mut cart = Cart::new();
//! cart.add(&catalog[0], 2)?;
//!
//! let sale_id = db
//!     .checkout()
//!     .process_session_sale(&session, cart.entries(), Discount::none())
//!     .await?;
//! let receipt = db.sales().get_line_items(sale_id).await?;
//! ```

pub mod checkout;
pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use checkout::{Checkout, CheckoutOptions, StockPolicy};
pub use config::{ConfigError, DbConfig};
pub use error::{CheckoutError, CheckoutStep, DbError, DbResult};
pub use pool::Database;

pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::supplier::SupplierRepository;
pub use repository::user::UserRepository;

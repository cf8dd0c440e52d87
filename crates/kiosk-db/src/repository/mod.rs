//! # Repository Module
//!
//! Single-table accessors for the kiosk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                │
//! │       │  db.products().list()                                          │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── create(&self, new_product)                                        │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── set_stock(&self, id, quantity)                                    │
//! │       │                                                                 │
//! │       │  one parameterized statement, autocommitted                    │
//! │       ▼                                                                 │
//! │  SQLite                                                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each call is its own unit of work: a supplier insert followed by a
//! failed product insert leaves the supplier in place. Only
//! [`crate::checkout`] groups several writes atomically.
//!
//! Every method returns [`crate::DbResult`], so an empty listing
//! (`Ok(vec![])`) is never confused with a failed one (`Err(_)`).
//!
//! ## Available Repositories
//!
//! - [`UserRepository`](user::UserRepository) - Accounts and login
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers
//! - [`ProductRepository`](product::ProductRepository) - Catalog and stock
//! - [`SaleRepository`](sale::SaleRepository) - Sale reads and the writes checkout composes

pub mod product;
pub mod sale;
pub mod supplier;
pub mod user;

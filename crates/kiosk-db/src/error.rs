//! # Database Error Types
//!
//! Error types for database operations and the checkout transaction.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ├──► repository callers: Ok(empty) vs Err(cause) stay distinct   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutError ← Which step of the sale failed; always rolled back     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use kiosk_core::{CoreError, ValidationError};
use thiserror::Error;
use tracing::{error, warn};

use crate::config::ConfigError;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Adding a user whose username is taken
    /// - Adding a supplier twice
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Product referencing a non-existent supplier
    /// - Sale referencing a non-existent cashier
    /// - Line item referencing a non-existent product
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK or NOT NULL constraint violation.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Configuration missing or malformed; there is no connection.
    #[error("No database connection: {0}")]
    Config(#[from] ConfigError),

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created or opened
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Input rejected before reaching the database.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started, committed or rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Whether this error means the storage engine could not be reached.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            DbError::Config(_) | DbError::ConnectionFailed(_) | DbError::PoolExhausted
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::Io / Tls       → DbError::ConnectionFailed
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let mapped = classify(err);
        match &mapped {
            DbError::NotFound { .. } => {}
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::ConstraintViolation { .. } => warn!(error = %mapped, "Statement rejected"),
            _ => error!(error = %mapped, "Database error"),
        }
        mapped
    }
}

fn classify(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::RowNotFound => DbError::NotFound {
            entity: "Record".to_string(),
            id: "unknown".to_string(),
        },

        sqlx::Error::Database(db_err) => {
            let msg = db_err.message();

            // SQLite constraint messages:
            // "UNIQUE constraint failed: <table>.<column>"
            // "FOREIGN KEY constraint failed"
            // "CHECK constraint failed: <expr>"
            // "NOT NULL constraint failed: <table>.<column>"
            if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                DbError::UniqueViolation {
                    field: field.to_string(),
                }
            } else if msg.contains("FOREIGN KEY constraint failed") {
                DbError::ForeignKeyViolation {
                    message: msg.to_string(),
                }
            } else if msg.contains("CHECK constraint failed")
                || msg.contains("NOT NULL constraint failed")
            {
                DbError::ConstraintViolation {
                    message: msg.to_string(),
                }
            } else {
                DbError::QueryFailed(msg.to_string())
            }
        }

        sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

        sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

        sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

        _ => DbError::Internal(err.to_string()),
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Checkout Errors
// =============================================================================

/// The write a failed checkout was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Inserting the sale row.
    SaleHeader,
    /// Inserting the line for the cart entry at `position` (0-based).
    LineItem { position: usize, product_id: i64 },
    /// Decrementing a product's stock.
    StockDecrement { product_id: i64 },
    /// Writing the accumulated total onto the sale row.
    Total,
    Commit,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutStep::SaleHeader => write!(f, "creating the sale"),
            CheckoutStep::LineItem {
                position,
                product_id,
            } => write!(f, "adding line {} (product {})", position + 1, product_id),
            CheckoutStep::StockDecrement { product_id } => {
                write!(f, "updating stock of product {}", product_id)
            }
            CheckoutStep::Total => write!(f, "saving the sale total"),
            CheckoutStep::Commit => write!(f, "committing the sale"),
        }
    }
}

/// Why a checkout failed.
///
/// Whatever the variant, nothing from the attempted sale was persisted.
/// `Display` gives a message fit to show the cashier.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A cart line was rejected before any write.
    #[error("Cart line {} is invalid: {source}", .position + 1)]
    InvalidEntry {
        position: usize,
        #[source]
        source: CoreError,
    },

    /// The transaction could not be opened.
    #[error("No database connection: {0}")]
    Connection(#[source] DbError),

    /// A statement inside the transaction failed.
    #[error("Sale not saved, failed while {step}: {source}")]
    Statement {
        step: CheckoutStep,
        #[source]
        source: DbError,
    },

    /// A business rule stopped the sale mid-transaction.
    #[error("Sale not saved: {0}")]
    Rejected(#[source] CoreError),
}

impl CheckoutError {
    pub(crate) fn at(step: CheckoutStep) -> impl FnOnce(sqlx::Error) -> CheckoutError {
        move |err| CheckoutError::Statement {
            step,
            source: err.into(),
        }
    }

    /// The write that was in progress, when a statement failed.
    pub fn failed_step(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutError::Statement { step, .. } => Some(*step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_messages() {
        let step = CheckoutStep::LineItem {
            position: 0,
            product_id: 7,
        };
        assert_eq!(step.to_string(), "adding line 1 (product 7)");
        assert_eq!(
            CheckoutStep::StockDecrement { product_id: 9 }.to_string(),
            "updating stock of product 9"
        );
    }

    #[test]
    fn test_checkout_error_messages() {
        let err = CheckoutError::Statement {
            step: CheckoutStep::Total,
            source: DbError::QueryFailed("disk I/O error".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Sale not saved, failed while saving the sale total: Query failed: disk I/O error"
        );
        assert_eq!(err.failed_step(), Some(CheckoutStep::Total));

        let err = CheckoutError::Rejected(CoreError::ProductNotFound(42));
        assert_eq!(err.to_string(), "Sale not saved: Product not found: 42");
        assert_eq!(err.failed_step(), None);
    }

    #[test]
    fn test_connection_classification() {
        assert!(DbError::PoolExhausted.is_connection());
        assert!(DbError::ConnectionFailed("refused".into()).is_connection());
        assert!(!DbError::not_found("Product", 7).is_connection());
        assert_eq!(
            DbError::not_found("Product", 7).to_string(),
            "Product not found: 7"
        );
    }
}

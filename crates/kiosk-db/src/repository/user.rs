//! # User Repository
//!
//! Kiosk accounts and login.
//!
//! The password column is written on create and compared on login; it is
//! never selected back out.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use kiosk_core::validation::{validate_password, validate_username};
use kiosk_core::{CashierSession, NewUser, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Adds a user (admin ABM form).
    ///
    /// ## Returns
    /// The new user's id. A taken username is [`DbError::UniqueViolation`].
    ///
    /// [`DbError::UniqueViolation`]: crate::DbError::UniqueViolation
    pub async fn create(&self, user: &NewUser) -> DbResult<i64> {
        validate_username(&user.username)?;
        validate_password(&user.password)?;

        debug!(username = %user.username, role = user.role.as_str(), "Creating user");

        let id = sqlx::query("INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)")
            .bind(user.username.trim())
            .bind(&user.password)
            .bind(user.role)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        Ok(id)
    }

    /// Lists all users, oldest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, username, role FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, role FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Looks up the user matching both username and password.
    ///
    /// `Ok(None)` means the credentials are wrong; `Err` means the lookup
    /// itself failed.
    pub async fn get_by_credentials(&self, username: &str, password: &str) -> DbResult<Option<User>> {
        debug!(username = %username, "Checking credentials");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, role
            FROM users
            WHERE username = ?1 AND password = ?2
            "#,
        )
        .bind(username.trim())
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Checks credentials and opens a session for the cashier.
    pub async fn login(&self, username: &str, password: &str) -> DbResult<Option<CashierSession>> {
        let session = self
            .get_by_credentials(username, password)
            .await?
            .map(CashierSession::from);

        match &session {
            Some(s) => info!(user_id = s.user_id, role = s.role.as_str(), "Cashier logged in"),
            None => info!(username = %username, "Login rejected"),
        }

        Ok(session)
    }
}

//! # Cashier Session
//!
//! Who is at the counter. Built once at login and passed explicitly into
//! every operation that needs the current user; there is no ambient
//! "current user" anywhere in the workspace.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashierSession {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl CashierSession {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with [`CoreError::Forbidden`] unless the user is an admin.
    ///
    /// `action` completes the sentence "is not allowed to ...".
    pub fn require_admin(&self, action: &str) -> CoreResult<()> {
        if self.is_admin() {
            return Ok(());
        }
        Err(CoreError::Forbidden {
            username: self.username.clone(),
            action: action.to_string(),
        })
    }
}

impl From<User> for CashierSession {
    fn from(user: User) -> Self {
        CashierSession {
            user_id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_user() {
        let session = CashierSession::from(User {
            id: 3,
            username: "ana".to_string(),
            role: Role::Employee,
        });
        assert_eq!(session.user_id, 3);
        assert!(!session.is_admin());
    }

    #[test]
    fn test_require_admin() {
        let admin = CashierSession {
            user_id: 1,
            username: "admin".to_string(),
            role: Role::Admin,
        };
        assert!(admin.require_admin("see reports").is_ok());

        let employee = CashierSession {
            role: Role::Employee,
            ..admin
        };
        let err = employee.require_admin("see reports").unwrap_err();
        assert_eq!(err.to_string(), "User 'admin' is not allowed to see reports");
    }
}

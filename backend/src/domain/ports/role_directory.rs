//! Driving port for role-scoped user queries.

use async_trait::async_trait;

use crate::domain::{Account, Error, Principal, Role, User};

/// Domain use-case port for reading users by role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleDirectory: Send + Sync {
    /// Users holding `role`, visible to staff callers only.
    async fn users_with_role(&self, caller: &Principal, role: Role) -> Result<Vec<User>, Error>;

    /// The caller's own account and profile.
    async fn own_account(&self, caller: &Principal) -> Result<Account, Error>;
}

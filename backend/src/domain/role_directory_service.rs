//! Role-scoped user queries.
//!
//! Listings are derived from the user store on every call with a single
//! role-filtered query; nothing is cached.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{RoleDirectory, UserPersistenceError, UserRepository};
use crate::domain::{Account, Error, Principal, Role, User};

/// Role directory backed by the user store.
#[derive(Clone)]
pub struct RoleDirectoryService<R> {
    users: Arc<R>,
}

impl<R> RoleDirectoryService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

impl<R: UserRepository> RoleDirectoryService<R> {
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            other => Error::internal(format!("user repository error: {other}")),
        }
    }

    fn may_list_users(caller: &Principal) -> bool {
        matches!(caller.role, Role::Admin | Role::Teacher)
    }
}

#[async_trait]
impl<R: UserRepository> RoleDirectory for RoleDirectoryService<R> {
    async fn users_with_role(&self, caller: &Principal, role: Role) -> Result<Vec<User>, Error> {
        if !Self::may_list_users(caller) {
            warn!(user_id = %caller.user_id, caller_role = %caller.role, "role listing denied");
            return Err(Error::forbidden("listing users requires a staff role"));
        }
        self.users
            .list_by_role(role)
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn own_account(&self, caller: &Principal) -> Result<Account, Error> {
        self.users
            .find_account(caller.user_id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("account no longer exists"))
    }
}

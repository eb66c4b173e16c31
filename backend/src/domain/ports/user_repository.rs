//! Port abstraction for the user store and its errors.
//!
//! The store owns identity uniqueness and the provisioning transaction:
//! [`UserRepository::register`] writes the user row and its role profile as a
//! single unit, so no caller ever observes one without the other.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{
    Account, Email, PersonalNames, ProfileDraft, Role, User, UserId, Username,
};

use super::define_port_error;

/// Identity attribute that must be unique across all users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Username,
    Email,
}

impl IdentityField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique identity attribute is already taken.
        DuplicateIdentity { field: IdentityField } =>
            "an account with this {field} already exists",
        /// The role profile could not be written; nothing was committed.
        Provisioning { message: String } => "profile provisioning failed: {message}",
    }
}

/// Account to be written by [`UserRepository::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub username: Username,
    pub email: Email,
    pub role: Role,
    pub names: PersonalNames,
    /// PHC-formatted credential hash; never the plaintext secret.
    pub password_hash: String,
    pub profile: Option<ProfileDraft>,
}

/// User record paired with its stored credential hash.
///
/// Only the login path reads this; every other read returns [`User`].
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub password_hash: String,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("user", &self.user)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Port for the user store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Atomically insert a user and, when the draft carries one, its profile.
    ///
    /// Username and email uniqueness are enforced by the store at write time
    /// and reported as [`UserPersistenceError::DuplicateIdentity`]. Any
    /// profile failure rolls the user insert back and is reported as
    /// [`UserPersistenceError::Provisioning`].
    async fn register(&self, account: &NewAccount) -> Result<Account, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user together with its role profile.
    async fn find_account(&self, id: UserId) -> Result<Option<Account>, UserPersistenceError>;

    /// Fetch the user and credential hash for a login identity.
    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// All users carrying `role`, ordered by id.
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError>;
}

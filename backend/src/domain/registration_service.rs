//! Account registration domain service.
//!
//! Implements [`RegistrationService`]: checks password strength, hashes the
//! secret off the async executor, then hands the account to the user store
//! which writes the user and its profile in one transaction.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialHasher, NewAccount, RegistrationService, UserPersistenceError, UserRepository,
};
use crate::domain::{Account, Error, RegistrationRequest, WeakPasswordReason, check_password};

/// Registration service backed by a user store and a credential hasher.
#[derive(Clone)]
pub struct AccountRegistrationService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AccountRegistrationService<R, H> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> AccountRegistrationService<R, H>
where
    R: UserRepository,
    H: CredentialHasher + 'static,
{
    fn weak_password(reasons: &[WeakPasswordReason]) -> Error {
        let codes: Vec<&str> = reasons.iter().map(|reason| reason.code()).collect();
        let messages: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        Error::invalid_request("password does not meet the strength requirements").with_details(
            json!({
                "field": "password",
                "code": "weak_password",
                "reasons": codes,
                "messages": messages,
            }),
        )
    }

    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::DuplicateIdentity { field } => {
                Error::invalid_request(format!("an account with this {field} already exists"))
                    .with_details(json!({
                        "field": field.as_str(),
                        "code": "duplicate_identity",
                    }))
            }
            UserPersistenceError::Provisioning { message } => {
                error!(%message, "profile provisioning failed; registration rolled back");
                Error::internal(format!("profile provisioning failed: {message}"))
            }
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    async fn hash_secret(&self, secret: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(secret.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(secret.as_str()))
            .await
            .map_err(|err| Error::internal(format!("credential hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }
}

#[async_trait]
impl<R, H> RegistrationService for AccountRegistrationService<R, H>
where
    R: UserRepository,
    H: CredentialHasher + 'static,
{
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error> {
        let role = request.role();
        if let Err(reasons) =
            check_password(request.password(), request.username(), request.email())
        {
            warn!(%role, reasons = ?reasons, "registration rejected: weak password");
            return Err(Self::weak_password(&reasons));
        }

        let password_hash = self.hash_secret(request.password()).await?;
        let new_account = NewAccount {
            username: request.username().clone(),
            email: request.email().clone(),
            role,
            names: request.names().clone(),
            password_hash,
            profile: request.profile().cloned(),
        };

        let account = self
            .users
            .register(&new_account)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = %account.user().id(), %role, "account registered");
        Ok(account)
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;

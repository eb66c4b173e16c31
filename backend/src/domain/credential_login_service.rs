//! Credential login domain service.
//!
//! Implements [`LoginService`] on top of the user store, the credential hasher
//! and the token service. Every credential failure collapses into the same
//! `invalid credentials` error, and unknown identities still pay for a hash
//! verification.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialHasher, LoginService, StoredCredentials, TokenError, TokenService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Error, IssuedTokens, LoginCredentials, LoginOutcome, Principal, TokenKind, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const INVALID_TOKEN: &str = "invalid or expired token";

/// Login service backed by the user store, a hasher and a token issuer.
#[derive(Clone)]
pub struct CredentialLoginService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
}

impl<R, H, T> CredentialLoginService<R, H, T> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }
}

impl<R, H, T> CredentialLoginService<R, H, T>
where
    R: UserRepository,
    H: CredentialHasher + 'static,
    T: TokenService,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            other => Error::internal(format!("user repository error: {other}")),
        }
    }

    fn map_issue_error(error: TokenError) -> Error {
        Error::internal(format!("token issuance failed: {error}"))
    }

    fn rejected_token(kind: TokenKind, error: &TokenError) -> Error {
        debug!(%kind, %error, "token rejected");
        Error::unauthorized(INVALID_TOKEN)
    }

    /// Verify the secret on a blocking thread, returning the user on success.
    async fn verify_secret(
        &self,
        stored: Option<StoredCredentials>,
        secret: &str,
    ) -> Result<Option<User>, Error> {
        let hasher = Arc::clone(&self.hasher);
        let secret = Zeroizing::new(secret.to_owned());
        tokio::task::spawn_blocking(move || match stored {
            Some(stored) => hasher
                .verify(secret.as_str(), &stored.password_hash)
                .map(|matches| matches.then_some(stored.user)),
            None => {
                hasher.verify_dummy(secret.as_str());
                Ok(None)
            }
        })
        .await
        .map_err(|err| Error::internal(format!("credential verification task failed: {err}")))?
        .map_err(|err| Error::internal(err.to_string()))
    }

    fn issue_pair(&self, user: &User) -> Result<IssuedTokens, Error> {
        Ok(IssuedTokens {
            access: self
                .tokens
                .issue(user, TokenKind::Access)
                .map_err(Self::map_issue_error)?,
            refresh: self
                .tokens
                .issue(user, TokenKind::Refresh)
                .map_err(Self::map_issue_error)?,
        })
    }
}

#[async_trait]
impl<R, H, T> LoginService for CredentialLoginService<R, H, T>
where
    R: UserRepository,
    H: CredentialHasher + 'static,
    T: TokenService,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let stored = self
            .users
            .find_credentials(credentials.username())
            .await
            .map_err(Self::map_persistence_error)?;

        let Some(user) = self.verify_secret(stored, credentials.password()).await? else {
            info!("login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let tokens = self.issue_pair(&user)?;
        info!(user_id = %user.id(), role = %user.role(), "login succeeded");
        Ok(LoginOutcome { user, tokens })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, Error> {
        let claims = self
            .tokens
            .validate(refresh_token, TokenKind::Refresh)
            .map_err(|err| Self::rejected_token(TokenKind::Refresh, &err))?;
        let user_id =
            UserId::new(claims.user_id).map_err(|_| Error::unauthorized(INVALID_TOKEN))?;

        // Re-read so the new access token reflects the current record.
        let Some(user) = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            debug!(%user_id, "refresh token for missing user");
            return Err(Error::unauthorized(INVALID_TOKEN));
        };

        self.tokens
            .issue(&user, TokenKind::Access)
            .map_err(Self::map_issue_error)
    }

    async fn authenticate(&self, access_token: &str) -> Result<Principal, Error> {
        let claims = self
            .tokens
            .validate(access_token, TokenKind::Access)
            .map_err(|err| Self::rejected_token(TokenKind::Access, &err))?;
        Principal::try_from(claims).map_err(|_| Error::unauthorized(INVALID_TOKEN))
    }
}

#[cfg(test)]
#[path = "credential_login_service_tests.rs"]
mod tests;

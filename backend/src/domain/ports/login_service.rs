//! Driving port for login and token use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials and bearer tokens without knowing (or importing)
//! the backing infrastructure.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome, Principal};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue an access/refresh token pair.
    ///
    /// Unknown identities and wrong secrets fail with the same error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, Error>;

    /// Resolve a bearer access token into the calling principal.
    async fn authenticate(&self, access_token: &str) -> Result<Principal, Error>;
}

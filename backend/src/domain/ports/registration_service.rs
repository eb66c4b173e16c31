//! Driving port for self-registration.
//!
//! Inbound adapters hand a validated [`RegistrationRequest`] to this port and
//! receive the committed account, never a half-provisioned one.

use async_trait::async_trait;

use crate::domain::{Account, Error, RegistrationRequest};

/// Domain use-case port for registering student and teacher accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create the user and its role profile as one unit.
    async fn register(&self, request: RegistrationRequest) -> Result<Account, Error>;
}

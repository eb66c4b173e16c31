//! Port for one-way credential hashing.
//!
//! Implementations are CPU bound; domain services call them from a blocking
//! thread rather than on the async executor.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hasher adapters.
    pub enum CredentialHashError {
        /// The secret could not be hashed.
        Hashing { message: String } => "credential hashing failed: {message}",
        /// A stored hash could not be parsed.
        MalformedHash { message: String } => "stored credential hash is malformed: {message}",
    }
}

/// Hash and verify user secrets.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Produce a salted hash of `secret` in PHC string format.
    fn hash(&self, secret: &str) -> Result<String, CredentialHashError>;

    /// Check `secret` against a previously produced hash.
    fn verify(&self, secret: &str, hash: &str) -> Result<bool, CredentialHashError>;

    /// Spend the same effort as [`CredentialHasher::verify`] without a stored
    /// hash, so unknown identities cannot be told apart by response time.
    fn verify_dummy(&self, secret: &str);
}

//! Argon2id implementation of the credential hasher port.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$...`) produced with
//! a fresh random salt and the crate's default parameters.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::domain::ports::{CredentialHashError, CredentialHasher};

const DUMMY_SECRET: &[u8] = b"campus-auth-timing-equaliser";

/// Argon2id credential hasher.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
    dummy_hash: String,
}

impl Argon2CredentialHasher {
    /// Build a hasher with default parameters.
    ///
    /// A dummy hash is computed up front so that verifying an unknown
    /// identity costs the same as verifying a real one.
    pub fn new() -> Result<Self, CredentialHashError> {
        let argon2 = Argon2::default();
        let dummy_hash = hash_with(&argon2, DUMMY_SECRET)?;
        Ok(Self { argon2, dummy_hash })
    }
}

fn hash_with(argon2: &Argon2<'_>, secret: &[u8]) -> Result<String, CredentialHashError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret, &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| CredentialHashError::hashing(err.to_string()))
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, secret: &str) -> Result<String, CredentialHashError> {
        hash_with(&self.argon2, secret.as_bytes())
    }

    fn verify(&self, secret: &str, hash: &str) -> Result<bool, CredentialHashError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|err| CredentialHashError::malformed_hash(err.to_string()))?;
        Ok(self
            .argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok())
    }

    fn verify_dummy(&self, secret: &str) {
        // The outcome is irrelevant; only the work matters.
        let _ = self.verify(secret, &self.dummy_hash);
    }
}

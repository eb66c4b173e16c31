//! Port for issuing and validating signed tokens.

use crate::domain::{TokenClaims, TokenKind, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token service adapters.
    pub enum TokenError {
        /// Signature, structure or claims were rejected.
        Invalid { message: String } => "token rejected: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// A token of the other kind was presented.
        WrongKind { expected: TokenKind } => "expected a {expected} token",
        /// A token could not be produced.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issue and validate access and refresh tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token of `kind` carrying claims built from `user`.
    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, TokenError>;

    /// Verify `token` and return its claims when it is a valid `expected` token.
    fn validate(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn wrong_kind_names_expected_kind() {
        let error = TokenError::wrong_kind(TokenKind::Refresh);
        assert_eq!(error.to_string(), "expected a refresh token");
        assert_eq!(TokenError::expired().to_string(), "token expired");
    }
}

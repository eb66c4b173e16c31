//! HS256 JSON Web Token implementation of the token service port.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{TokenClaims, TokenKind, User};

/// Lifetimes, in seconds, of issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access_secs: i64,
    pub refresh_secs: i64,
}

impl Default for TokenLifetimes {
    /// Five minute access tokens and one day refresh tokens.
    fn default() -> Self {
        Self {
            access_secs: 300,
            refresh_secs: 86_400,
        }
    }
}

impl TokenLifetimes {
    fn for_kind(self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_secs,
            TokenKind::Refresh => self.refresh_secs,
        }
    }
}

/// Signs and validates tokens with a shared HMAC secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetimes: TokenLifetimes,
}

impl JwtTokenService {
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetimes,
        }
    }

    fn sign(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|err| TokenError::signing(err.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &User, kind: TokenKind) -> Result<String, TokenError> {
        let claims = TokenClaims::for_user(
            user,
            kind,
            Utc::now().timestamp(),
            self.lifetimes.for_kind(kind),
        );
        self.sign(&claims)
    }

    fn validate(&self, token: &str, expected: TokenKind) -> Result<TokenClaims, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::expired(),
                _ => TokenError::invalid(err.to_string()),
            })?;
        if claims.token_type != expected {
            return Err(TokenError::wrong_kind(expected));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Email, Role, UserId, Username};
    use rstest::{fixture, rstest};

    const SECRET: &[u8] = b"test-signing-secret";

    #[fixture]
    fn alice() -> User {
        User::new(
            UserId::new(7).expect("positive id"),
            Username::new("alice").expect("valid username"),
            Email::new("a@x.com").expect("valid email"),
            Role::Student,
        )
    }

    #[fixture]
    fn service() -> JwtTokenService {
        JwtTokenService::new(SECRET, TokenLifetimes::default())
    }

    #[rstest]
    fn issued_access_token_carries_user_claims(service: JwtTokenService, alice: User) {
        let token = service.issue(&alice, TokenKind::Access).expect("signed");
        let claims = service
            .validate(&token, TokenKind::Access)
            .expect("valid token");

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, Role::Student);
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[rstest]
    fn refresh_lifetime_applies(service: JwtTokenService, alice: User) {
        let token = service.issue(&alice, TokenKind::Refresh).expect("signed");
        let claims = service
            .validate(&token, TokenKind::Refresh)
            .expect("valid token");
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[rstest]
    #[case(TokenKind::Access, TokenKind::Refresh)]
    #[case(TokenKind::Refresh, TokenKind::Access)]
    fn kinds_are_not_interchangeable(
        service: JwtTokenService,
        alice: User,
        #[case] issued: TokenKind,
        #[case] expected: TokenKind,
    ) {
        let token = service.issue(&alice, issued).expect("signed");
        assert_eq!(
            service.validate(&token, expected),
            Err(TokenError::wrong_kind(expected))
        );
    }

    #[rstest]
    fn expired_token_is_reported(alice: User) {
        let service = JwtTokenService::new(
            SECRET,
            TokenLifetimes {
                access_secs: -10,
                refresh_secs: 60,
            },
        );
        let token = service.issue(&alice, TokenKind::Access).expect("signed");
        assert_eq!(
            service.validate(&token, TokenKind::Access),
            Err(TokenError::expired())
        );
    }

    #[rstest]
    fn foreign_signature_is_invalid(alice: User) {
        let issuer = JwtTokenService::new(b"another-secret", TokenLifetimes::default());
        let token = issuer.issue(&alice, TokenKind::Access).expect("signed");
        let error = JwtTokenService::new(SECRET, TokenLifetimes::default())
            .validate(&token, TokenKind::Access)
            .expect_err("wrong key");
        assert!(matches!(error, TokenError::Invalid { .. }));
    }

    #[rstest]
    fn garbage_is_invalid(service: JwtTokenService) {
        assert!(matches!(
            service.validate("not.a.token", TokenKind::Access),
            Err(TokenError::Invalid { .. })
        ));
    }

    #[rstest]
    fn every_token_has_a_distinct_id(service: JwtTokenService, alice: User) {
        let first = service.issue(&alice, TokenKind::Access).expect("signed");
        let second = service.issue(&alice, TokenKind::Access).expect("signed");
        assert_ne!(first, second);
    }
}

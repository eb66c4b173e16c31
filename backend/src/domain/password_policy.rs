//! Password strength rules applied at registration.
//!
//! Every rule is evaluated so callers can report all unmet requirements at
//! once instead of one per attempt.

use std::fmt;

use serde::Serialize;

use super::user::{Email, Username};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Shortest attribute value considered when checking similarity.
const SIMILARITY_MIN_LENGTH: usize = 3;

/// Frequently used passwords rejected regardless of other rules.
const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "password1",
    "password123", "welcome", "welcome1", "admin", "admin123", "passw0rd", "p@ssw0rd",
    "changeme", "secret", "letmein1", "qwerty123", "iloveyou1", "football1", "baseball1",
];

/// A password rule the candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakPasswordReason {
    TooShort,
    EntirelyNumeric,
    TooCommon,
    SimilarToUsername,
    SimilarToEmail,
}

impl WeakPasswordReason {
    /// Stable machine-readable reason code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::EntirelyNumeric => "entirely_numeric",
            Self::TooCommon => "too_common",
            Self::SimilarToUsername => "similar_to_username",
            Self::SimilarToEmail => "similar_to_email",
        }
    }
}

impl fmt::Display for WeakPasswordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "password must contain at least {PASSWORD_MIN_LENGTH} characters"
            ),
            Self::EntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::TooCommon => write!(f, "password is too common"),
            Self::SimilarToUsername => write!(f, "password is too similar to the username"),
            Self::SimilarToEmail => write!(f, "password is too similar to the email address"),
        }
    }
}

/// Check `password` against every rule, returning all failures.
///
/// # Examples
/// ```
/// use campus_auth::domain::{Email, Username, WeakPasswordReason, check_password};
///
/// let username = Username::new("alice").unwrap();
/// let email = Email::new("alice@example.com").unwrap();
/// assert!(check_password("Str0ng!Pass", &username, &email).is_ok());
/// let reasons = check_password("1234", &username, &email).unwrap_err();
/// assert!(reasons.contains(&WeakPasswordReason::TooShort));
/// ```
pub fn check_password(
    password: &str,
    username: &Username,
    email: &Email,
) -> Result<(), Vec<WeakPasswordReason>> {
    let mut reasons = Vec::new();

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        reasons.push(WeakPasswordReason::TooShort);
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        reasons.push(WeakPasswordReason::EntirelyNumeric);
    }
    let lowered = password.trim().to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        reasons.push(WeakPasswordReason::TooCommon);
    }
    if is_similar(&lowered, username.as_ref()) {
        reasons.push(WeakPasswordReason::SimilarToUsername);
    }
    if is_similar(&lowered, email.local_part()) || is_similar(&lowered, email.as_ref()) {
        reasons.push(WeakPasswordReason::SimilarToEmail);
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(reasons)
    }
}

/// Case-insensitive containment in either direction.
fn is_similar(lowered_password: &str, attribute: &str) -> bool {
    let attribute = attribute.to_lowercase();
    if attribute.chars().count() < SIMILARITY_MIN_LENGTH
        || lowered_password.chars().count() < SIMILARITY_MIN_LENGTH
    {
        return false;
    }
    lowered_password.contains(&attribute) || attribute.contains(lowered_password)
}

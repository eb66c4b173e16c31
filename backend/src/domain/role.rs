//! Role tags classifying every user account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role tag stored alongside each user record.
///
/// The role is fixed when the account is created. Student and teacher
/// accounts carry exactly one matching profile; admin accounts carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Staff operator; created out of band, never self-registered.
    Admin,
    /// Learner with a student profile.
    Student,
    /// Instructor with a teacher profile.
    Teacher,
}

/// Error returned when a role string does not name a known role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {value}")]
pub struct RoleParseError {
    pub value: String,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Student, Role::Teacher];

    /// Canonical upper-case tag persisted in storage and token claims.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Student => "STUDENT",
            Self::Teacher => "TEACHER",
        }
    }

    /// Whether accounts of this role may be created through public registration.
    pub const fn allows_self_registration(self) -> bool {
        matches!(self, Self::Student | Self::Teacher)
    }

    /// Whether accounts of this role require a provisioned profile.
    pub const fn requires_profile(self) -> bool {
        matches!(self, Self::Student | Self::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    /// Parse a role tag case-insensitively, so `/register/student/` and
    /// `STUDENT` claims resolve to the same variant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoleParseError {
                value: s.to_owned(),
            })
    }
}

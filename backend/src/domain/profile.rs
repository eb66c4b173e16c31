//! Role-specific profile records.
//!
//! Student and teacher accounts each own exactly one profile of the matching
//! kind. Profiles are keyed by the owning [`UserId`] and carry a role
//! identifier that is unique within its table.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;
use super::user::{User, UserId};

/// Maximum length for free-form profile fields (programme, department).
pub const PROFILE_FIELD_MAX: usize = 100;

/// Profile attached to a student account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub user_id: UserId,
    pub student_id: i32,
    pub programme: Option<String>,
}

/// Profile attached to a teacher account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfile {
    pub user_id: UserId,
    pub teacher_id: i32,
    pub department: Option<String>,
}

/// Profile record selected by the owning user's [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Profile {
    Student(StudentProfile),
    Teacher(TeacherProfile),
}

impl Profile {
    /// Role whose accounts own this kind of profile.
    pub fn role(&self) -> Role {
        match self {
            Self::Student(_) => Role::Student,
            Self::Teacher(_) => Role::Teacher,
        }
    }

    /// Identifier of the owning user.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Student(profile) => profile.user_id,
            Self::Teacher(profile) => profile.user_id,
        }
    }
}

/// Raised when a user and profile pairing breaks the one-profile-per-role rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountInvariantError {
    MissingProfile { role: Role },
    UnexpectedProfile { role: Role },
    MismatchedProfile { role: Role, profile_role: Role },
    ForeignProfile { user_id: UserId, owner: UserId },
}

impl fmt::Display for AccountInvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProfile { role } => write!(f, "{role} account has no profile"),
            Self::UnexpectedProfile { role } => {
                write!(f, "{role} account must not carry a profile")
            }
            Self::MismatchedProfile { role, profile_role } => {
                write!(f, "{role} account carries a {profile_role} profile")
            }
            Self::ForeignProfile { user_id, owner } => {
                write!(f, "profile of user {owner} attached to user {user_id}")
            }
        }
    }
}

impl std::error::Error for AccountInvariantError {}

/// A user together with its role profile.
///
/// ## Invariants
/// - Student and teacher users carry exactly one profile of the matching kind.
/// - Admin users carry none.
/// - The profile belongs to the user it is paired with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    user: User,
    profile: Option<Profile>,
}

impl Account {
    /// Pair a user with its profile, checking the role invariants.
    pub fn new(user: User, profile: Option<Profile>) -> Result<Self, AccountInvariantError> {
        let role = user.role();
        match (&profile, role.requires_profile()) {
            (None, true) => return Err(AccountInvariantError::MissingProfile { role }),
            (Some(_), false) => return Err(AccountInvariantError::UnexpectedProfile { role }),
            (Some(found), true) if found.role() != role => {
                return Err(AccountInvariantError::MismatchedProfile {
                    role,
                    profile_role: found.role(),
                });
            }
            (Some(found), true) if found.user_id() != user.id() => {
                return Err(AccountInvariantError::ForeignProfile {
                    user_id: user.id(),
                    owner: found.user_id(),
                });
            }
            _ => {}
        }
        Ok(Self { user, profile })
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Split the account into its parts.
    pub fn into_parts(self) -> (User, Option<Profile>) {
        (self.user, self.profile)
    }
}

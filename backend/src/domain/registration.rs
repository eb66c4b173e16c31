//! Registration request parsing.
//!
//! Raw request fields are validated here so the registration service only
//! sees well-formed values. Uniqueness is deliberately not checked: the user
//! store enforces it when the account is written.

use std::fmt;

use zeroize::Zeroizing;

use super::provisioning::{ProfileDraft, ProvisioningValidationError, RoleFields};
use super::role::Role;
use super::user::{Email, PersonalNames, UserValidationError, Username};

/// Raw registration inputs as received from an inbound adapter.
#[derive(Clone, Copy)]
pub struct RegistrationParts<'a> {
    pub role: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
}

impl fmt::Debug for RegistrationParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationParts")
            .field("role", &self.role)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish_non_exhaustive()
    }
}

/// Reasons a registration payload is rejected before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Role is unknown or not open to self-registration.
    InvalidRole { value: String },
    /// A user field failed validation.
    InvalidField {
        field: &'static str,
        source: UserValidationError,
    },
    /// The password was empty.
    EmptyPassword,
    /// A role-specific field failed validation.
    InvalidRoleField(ProvisioningValidationError),
}

impl RegistrationValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidRole { .. } => "role",
            Self::InvalidField { field, .. } => field,
            Self::EmptyPassword => "password",
            Self::InvalidRoleField(err) => err.field(),
        }
    }

    /// Stable machine-readable failure code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRole { .. } => "invalid_role",
            Self::InvalidField { source, .. } => match source {
                UserValidationError::EmptyUsername => "empty_username",
                UserValidationError::UsernameTooLong { .. }
                | UserValidationError::UsernameInvalidCharacters => "invalid_username",
                UserValidationError::EmptyEmail
                | UserValidationError::EmailTooLong { .. }
                | UserValidationError::InvalidEmail => "invalid_email",
                UserValidationError::NameTooLong { .. } => "invalid_name",
                UserValidationError::InvalidId => "invalid_id",
            },
            Self::EmptyPassword => "empty_password",
            Self::InvalidRoleField(_) => "invalid_role_field",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRole { value } => {
                write!(f, "role {value:?} is not open to registration")
            }
            Self::InvalidField { source, .. } => write!(f, "{source}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::InvalidRoleField(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration request.
///
/// ## Invariants
/// - `role` allows self-registration.
/// - `profile` is present exactly when `role` requires one, and matches it.
/// - `password` is non-empty; strength is checked by the registration service.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    role: Role,
    username: Username,
    email: Email,
    password: Zeroizing<String>,
    names: PersonalNames,
    profile: Option<ProfileDraft>,
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("role", &self.role)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("names", &self.names)
            .field("profile", &self.profile)
            .finish()
    }
}

impl RegistrationRequest {
    /// Validate raw inputs into a request.
    ///
    /// # Examples
    /// ```
    /// use campus_auth::domain::{RegistrationParts, RegistrationRequest, Role, RoleFields};
    ///
    /// let parts = RegistrationParts {
    ///     role: "student",
    ///     username: "alice",
    ///     email: "a@x.com",
    ///     password: "Str0ng!Pass",
    ///     first_name: None,
    ///     last_name: None,
    /// };
    /// let request = RegistrationRequest::try_from_parts(parts, RoleFields::default()).unwrap();
    /// assert_eq!(request.role(), Role::Student);
    /// ```
    pub fn try_from_parts(
        parts: RegistrationParts<'_>,
        role_fields: RoleFields,
    ) -> Result<Self, RegistrationValidationError> {
        let role = parts
            .role
            .parse::<Role>()
            .ok()
            .filter(|role| role.allows_self_registration())
            .ok_or_else(|| RegistrationValidationError::InvalidRole {
                value: parts.role.to_owned(),
            })?;

        let invalid = |field: &'static str| {
            move |source| RegistrationValidationError::InvalidField { field, source }
        };
        let username = Username::new(parts.username).map_err(invalid("username"))?;
        let email = Email::new(parts.email).map_err(invalid("email"))?;
        if parts.password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        PersonalNames::new(parts.first_name, None).map_err(invalid("firstName"))?;
        let names =
            PersonalNames::new(parts.first_name, parts.last_name).map_err(invalid("lastName"))?;
        let profile = ProfileDraft::for_role(role, role_fields)
            .map_err(RegistrationValidationError::InvalidRoleField)?;

        Ok(Self {
            role,
            username,
            email,
            password: Zeroizing::new(parts.password.to_owned()),
            names,
            profile,
        })
    }

    /// Role the account is registered under.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Validated login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Validated contact address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plain-text password, held in zeroizing storage until hashed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Optional first and last names.
    pub fn names(&self) -> &PersonalNames {
        &self.names
    }

    /// Profile to provision, present for student and teacher requests.
    pub fn profile(&self) -> Option<&ProfileDraft> {
        self.profile.as_ref()
    }
}

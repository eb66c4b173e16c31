//! Diesel and pool error mapping for the user and snippet stores.
//!
//! Unique violations are attributed to an identity field by constraint name,
//! falling back to the database message when the driver omits the name.
//! Snippet writes that reference a missing owner surface as
//! [`SnippetPersistenceError::UnknownOwner`].

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::UserId;
use crate::domain::ports::{IdentityField, SnippetPersistenceError, UserPersistenceError};

use super::pool::PoolError;

pub(super) const USERNAME_CONSTRAINT: &str = "users_username_key";
pub(super) const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Map pool errors into connection failures.
pub(super) fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

/// Map pool errors into snippet store connection failures.
pub(super) fn map_snippet_pool_error(error: PoolError) -> SnippetPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SnippetPersistenceError::connection(message)
        }
    }
}

fn log_diesel_error(error: &DieselError, operation: &'static str) {
    match error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = ?info.constraint_name(),
            operation,
            "diesel operation failed"
        ),
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            error = %error,
            operation,
            "diesel operation failed"
        ),
    }
}

/// Identify which identity field a unique violation refers to.
fn duplicate_field(constraint: Option<&str>, message: &str) -> Option<IdentityField> {
    let haystack = constraint.unwrap_or(message);
    if haystack.contains(USERNAME_CONSTRAINT) || haystack.contains("(username)") {
        Some(IdentityField::Username)
    } else if haystack.contains(EMAIL_CONSTRAINT) || haystack.contains("(email)") {
        Some(IdentityField::Email)
    } else {
        None
    }
}

/// Map errors raised while reading or writing the users table.
pub(super) fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    log_diesel_error(&error, "users");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match duplicate_field(info.constraint_name(), info.message()) {
                Some(field) => UserPersistenceError::duplicate_identity(field),
                None => UserPersistenceError::query(info.message().to_owned()),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            UserPersistenceError::query(info.message().to_owned())
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        other => UserPersistenceError::query(other.to_string()),
    }
}

/// Map errors raised by snippet queries. `owner` names the account a write
/// was attributed to, so a foreign key failure can report it.
pub(super) fn map_snippet_error(
    error: DieselError,
    owner: Option<UserId>,
) -> SnippetPersistenceError {
    log_diesel_error(&error, "snippets");
    match (error, owner) {
        (DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _), Some(owner)) => {
            SnippetPersistenceError::unknown_owner(owner)
        }
        (DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _), _) => {
            SnippetPersistenceError::connection("database connection error")
        }
        (DieselError::DatabaseError(_, info), _) => {
            SnippetPersistenceError::query(info.message().to_owned())
        }
        (other, _) => SnippetPersistenceError::query(other.to_string()),
    }
}

/// Map errors raised while writing a profile inside the registration
/// transaction. Everything except a dropped connection is a provisioning
/// failure, including unique violations on the role identifier.
pub(super) fn map_provisioning_error(error: DieselError) -> UserPersistenceError {
    log_diesel_error(&error, "profile provisioning");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => {
            UserPersistenceError::provisioning(info.message().to_owned())
        }
        other => UserPersistenceError::provisioning(other.to_string()),
    }
}

//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    ChoiceParseError, Email, InvalidSnippetId, Language, PersonalNames, Profile, Role, Snippet,
    SnippetDraft, SnippetId, SnippetOwner, StudentProfile, Style, TeacherProfile, User, UserId,
    UserValidationError, Username,
};

use super::schema::{snippets, student_profiles, teacher_profiles, users};

/// Failure converting a stored row back into domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum RowConversionError {
    #[error("stored user field is invalid: {0}")]
    User(UserValidationError),
    #[error("stored role is unknown: {0}")]
    Role(String),
    #[error("stored snippet identifier is invalid: {0}")]
    SnippetId(InvalidSnippetId),
    #[error("stored snippet field is invalid: {0}")]
    Choice(ChoiceParseError),
}

impl From<UserValidationError> for RowConversionError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<User, RowConversionError> {
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| RowConversionError::Role(err.value))?;
        let names =
            PersonalNames::new(Some(self.first_name.as_str()), Some(self.last_name.as_str()))?;
        Ok(User::new(
            UserId::new(self.id)?,
            Username::new(&self.username)?,
            Email::new(&self.email)?,
            role,
        )
        .with_names(names))
    }
}

/// Row struct for the login lookup, including the credential hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    #[diesel(embed)]
    pub user: UserRow,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading student profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = student_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentProfileRow {
    pub user_id: i64,
    pub student_id: i32,
    pub programme: Option<String>,
}

/// Insertable student profile; a `None` identifier takes the sequence default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = student_profiles)]
pub(crate) struct NewStudentProfileRow<'a> {
    pub user_id: i64,
    pub student_id: Option<i32>,
    pub programme: Option<&'a str>,
}

/// Row struct for reading teacher profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = teacher_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TeacherProfileRow {
    pub user_id: i64,
    pub teacher_id: i32,
    pub department: Option<String>,
}

/// Insertable teacher profile; a `None` identifier takes the sequence default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = teacher_profiles)]
pub(crate) struct NewTeacherProfileRow<'a> {
    pub user_id: i64,
    pub teacher_id: Option<i32>,
    pub department: Option<&'a str>,
}

/// Row struct for reading snippets; the owner name comes from a join.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = snippets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SnippetRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub code: String,
    pub lineos: bool,
    pub language: String,
    pub style: String,
    pub owner_id: i64,
}

impl SnippetRow {
    pub(crate) fn into_snippet(self, owner_name: &str) -> Result<Snippet, RowConversionError> {
        Ok(Snippet {
            id: SnippetId::new(self.id).map_err(RowConversionError::SnippetId)?,
            language: self
                .language
                .parse::<Language>()
                .map_err(RowConversionError::Choice)?,
            style: self.style.parse::<Style>().map_err(RowConversionError::Choice)?,
            title: self.title,
            code: self.code,
            lineos: self.lineos,
            owner: SnippetOwner {
                id: UserId::new(self.owner_id)?,
                username: Username::new(owner_name)?,
            },
            created_at: self.created_at,
        })
    }
}

/// Writable snippet columns, shared by insert and full replacement.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = snippets)]
pub(crate) struct SnippetChanges<'a> {
    pub title: &'a str,
    pub code: &'a str,
    pub lineos: bool,
    pub language: &'a str,
    pub style: &'a str,
}

impl<'a> From<&'a SnippetDraft> for SnippetChanges<'a> {
    fn from(draft: &'a SnippetDraft) -> Self {
        Self {
            title: draft.title(),
            code: draft.code(),
            lineos: draft.lineos(),
            language: draft.language().as_str(),
            style: draft.style().as_str(),
        }
    }
}

/// Insertable snippet row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = snippets)]
pub(crate) struct NewSnippetRow<'a> {
    #[diesel(embed)]
    pub changes: SnippetChanges<'a>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

impl StudentProfileRow {
    pub(crate) fn into_profile(self) -> Result<Profile, RowConversionError> {
        Ok(Profile::Student(StudentProfile {
            user_id: UserId::new(self.user_id)?,
            student_id: self.student_id,
            programme: self.programme,
        }))
    }
}

impl TeacherProfileRow {
    pub(crate) fn into_profile(self) -> Result<Profile, RowConversionError> {
        Ok(Profile::Teacher(TeacherProfile {
            user_id: UserId::new(self.user_id)?,
            teacher_id: self.teacher_id,
            department: self.department,
        }))
    }
}

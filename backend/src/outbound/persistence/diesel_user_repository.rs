//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Registration inserts the user row and its profile inside one transaction.
//! The profile insert targets the unique `user_id` column with
//! `ON CONFLICT DO NOTHING` and is read back afterwards, so a repeated
//! provisioning step can never produce a second profile.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{NewAccount, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{Account, Profile, ProfileDraft, Role, User, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_provisioning_error};
use super::models::{
    CredentialRow, NewStudentProfileRow, NewTeacherProfileRow, NewUserRow, RowConversionError,
    StudentProfileRow, TeacherProfileRow, UserRow,
};
use super::pool::DbPool;
use super::schema::{student_profiles, teacher_profiles, users};

/// Diesel-backed implementation of the user store port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the registration transaction, keeping track of which step
/// failed so profile errors surface as provisioning failures.
#[derive(Debug)]
enum RegistrationTxError {
    Store(DieselError),
    Provisioning(DieselError),
}

impl From<DieselError> for RegistrationTxError {
    fn from(value: DieselError) -> Self {
        Self::Store(value)
    }
}

/// Profile rows as read back from either profile table.
enum ProfileRow {
    Student(StudentProfileRow),
    Teacher(TeacherProfileRow),
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile, RowConversionError> {
        match self {
            Self::Student(row) => row.into_profile(),
            Self::Teacher(row) => row.into_profile(),
        }
    }
}

fn map_conversion_error(error: RowConversionError) -> UserPersistenceError {
    UserPersistenceError::query(error.to_string())
}

fn assemble_account(
    user_row: UserRow,
    profile_row: Option<ProfileRow>,
) -> Result<Account, UserPersistenceError> {
    let user = user_row.into_user().map_err(map_conversion_error)?;
    let profile = profile_row
        .map(ProfileRow::into_profile)
        .transpose()
        .map_err(map_conversion_error)?;
    Account::new(user, profile).map_err(|err| UserPersistenceError::query(err.to_string()))
}

const ADVANCE_STUDENT_SEQUENCE: &str = "SELECT setval('student_identifier_seq', \
     GREATEST($1, (SELECT last_value FROM student_identifier_seq)))";
const ADVANCE_TEACHER_SEQUENCE: &str = "SELECT setval('teacher_identifier_seq', \
     GREATEST($1, (SELECT last_value FROM teacher_identifier_seq)))";

/// Move an identifier sequence past a caller-supplied value so later
/// generated identifiers do not collide with it.
async fn advance_sequence(
    conn: &mut AsyncPgConnection,
    statement: &'static str,
    supplied: i32,
) -> Result<(), DieselError> {
    diesel::sql_query(statement)
        .bind::<Integer, _>(supplied)
        .execute(conn)
        .await
        .map(drop)
}

async fn provision_profile(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    draft: &ProfileDraft,
) -> Result<ProfileRow, DieselError> {
    match draft {
        ProfileDraft::Student {
            student_id,
            programme,
        } => {
            diesel::insert_into(student_profiles::table)
                .values(&NewStudentProfileRow {
                    user_id,
                    student_id: *student_id,
                    programme: programme.as_deref(),
                })
                .on_conflict(student_profiles::user_id)
                .do_nothing()
                .execute(conn)
                .await?;
            if let Some(id) = student_id {
                advance_sequence(conn, ADVANCE_STUDENT_SEQUENCE, *id).await?;
            }
            student_profiles::table
                .filter(student_profiles::user_id.eq(user_id))
                .select(StudentProfileRow::as_select())
                .first(conn)
                .await
                .map(ProfileRow::Student)
        }
        ProfileDraft::Teacher {
            teacher_id,
            department,
        } => {
            diesel::insert_into(teacher_profiles::table)
                .values(&NewTeacherProfileRow {
                    user_id,
                    teacher_id: *teacher_id,
                    department: department.as_deref(),
                })
                .on_conflict(teacher_profiles::user_id)
                .do_nothing()
                .execute(conn)
                .await?;
            if let Some(id) = teacher_id {
                advance_sequence(conn, ADVANCE_TEACHER_SEQUENCE, *id).await?;
            }
            teacher_profiles::table
                .filter(teacher_profiles::user_id.eq(user_id))
                .select(TeacherProfileRow::as_select())
                .first(conn)
                .await
                .map(ProfileRow::Teacher)
        }
    }
}

async fn load_profile(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    role: Role,
) -> Result<Option<ProfileRow>, DieselError> {
    match role {
        Role::Student => student_profiles::table
            .filter(student_profiles::user_id.eq(user_id))
            .select(StudentProfileRow::as_select())
            .first(conn)
            .await
            .optional()
            .map(|row| row.map(ProfileRow::Student)),
        Role::Teacher => teacher_profiles::table
            .filter(teacher_profiles::user_id.eq(user_id))
            .select(TeacherProfileRow::as_select())
            .first(conn)
            .await
            .optional()
            .map(|row| row.map(ProfileRow::Teacher)),
        Role::Admin => Ok(None),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn register(&self, account: &NewAccount) -> Result<Account, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_user = NewUserRow {
            username: account.username.as_ref(),
            email: account.email.as_ref(),
            password_hash: account.password_hash.as_str(),
            role: account.role.as_str(),
            first_name: account.names.first_name(),
            last_name: account.names.last_name(),
            created_at: Utc::now(),
        };
        let draft = account.profile.as_ref();

        let (user_row, profile_row) = conn
            .transaction::<_, RegistrationTxError, _>(|conn| {
                async move {
                    let user_row = diesel::insert_into(users::table)
                        .values(&new_user)
                        .returning(UserRow::as_returning())
                        .get_result::<UserRow>(conn)
                        .await?;

                    let profile_row = match draft {
                        Some(draft) => Some(
                            provision_profile(conn, user_row.id, draft)
                                .await
                                .map_err(RegistrationTxError::Provisioning)?,
                        ),
                        None => None,
                    };
                    Ok((user_row, profile_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| match err {
                RegistrationTxError::Store(err) => map_diesel_error(err),
                RegistrationTxError::Provisioning(err) => map_provisioning_error(err),
            })?;

        debug!(user_id = user_row.id, role = %account.role, "user and profile committed");
        assemble_account(user_row, profile_row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(UserRow::into_user)
            .transpose()
            .map_err(map_conversion_error)
    }

    async fn find_account(&self, id: UserId) -> Result<Option<Account>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(user_row) = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let role = user_row
            .role
            .parse::<Role>()
            .map_err(|err| map_conversion_error(RowConversionError::Role(err.value)))?;
        let profile_row = load_profile(&mut conn, user_row.id, role)
            .await
            .map_err(map_diesel_error)?;
        assemble_account(user_row, profile_row).map(Some)
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::username.eq(username))
            .select(CredentialRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            Ok(StoredCredentials {
                user: row.user.into_user().map_err(map_conversion_error)?,
                password_hash: row.password_hash,
            })
        })
        .transpose()
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = users::table
            .filter(users::role.eq(role.as_str()))
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(UserRow::into_user)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_conversion_error)
    }
}

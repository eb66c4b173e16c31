//! In-memory user and snippet stores.
//!
//! Back the service when no database URL is configured and drive the
//! integration tests. All state lives behind one mutex: uniqueness checks and
//! the user plus profile writes happen in a single critical section, so the
//! store honours the same atomicity rules as the PostgreSQL adapter.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    IdentityField, NewAccount, StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Account, Profile, ProfileDraft, Role, StudentProfile, TeacherProfile, User, UserId,
};

mod snippets;

pub use snippets::InMemorySnippetRepository;

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
struct Sequence {
    last: i32,
}

impl Sequence {
    fn next(&mut self) -> Option<i32> {
        self.last = self.last.checked_add(1)?;
        Some(self.last)
    }

    /// Move past an identifier chosen by the caller.
    fn observe(&mut self, supplied: i32) {
        self.last = self.last.max(supplied);
    }
}

#[derive(Debug, Default)]
struct StoreState {
    users: BTreeMap<i64, StoredUser>,
    profiles: HashMap<i64, Profile>,
    last_user_id: i64,
    student_ids: Sequence,
    teacher_ids: Sequence,
    fail_next_provisioning: bool,
}

impl StoreState {
    fn identity_taken(&self, account: &NewAccount) -> Option<IdentityField> {
        self.users.values().find_map(|stored| {
            if stored.user.username() == &account.username {
                Some(IdentityField::Username)
            } else if stored.user.email() == &account.email {
                Some(IdentityField::Email)
            } else {
                None
            }
        })
    }

    fn role_id_taken(&self, role: Role, id: i32) -> bool {
        self.profiles.values().any(|profile| match (role, profile) {
            (Role::Student, Profile::Student(existing)) => existing.student_id == id,
            (Role::Teacher, Profile::Teacher(existing)) => existing.teacher_id == id,
            _ => false,
        })
    }

    /// Build the profile for `user_id` without storing it, so a failure leaves
    /// no user or profile behind. Sequences may still advance, as they do in
    /// PostgreSQL.
    fn draft_profile(
        &mut self,
        user_id: UserId,
        draft: &ProfileDraft,
    ) -> Result<Profile, UserPersistenceError> {
        if std::mem::take(&mut self.fail_next_provisioning) {
            return Err(UserPersistenceError::provisioning(
                "profile write rejected by store",
            ));
        }
        if self.profiles.contains_key(&user_id.get()) {
            return Err(UserPersistenceError::provisioning(format!(
                "user {user_id} already has a profile"
            )));
        }
        let (role, supplied) = match draft {
            ProfileDraft::Student { student_id, .. } => (Role::Student, *student_id),
            ProfileDraft::Teacher { teacher_id, .. } => (Role::Teacher, *teacher_id),
        };
        let role_id = match supplied {
            Some(id) if self.role_id_taken(role, id) => {
                return Err(UserPersistenceError::provisioning(format!(
                    "{role} identifier {id} already assigned"
                )));
            }
            Some(id) => {
                self.sequence(role).observe(id);
                id
            }
            None => self.next_free_id(role)?,
        };
        let profile = match draft {
            ProfileDraft::Student { programme, .. } => Profile::Student(StudentProfile {
                user_id,
                student_id: role_id,
                programme: programme.clone(),
            }),
            ProfileDraft::Teacher { department, .. } => Profile::Teacher(TeacherProfile {
                user_id,
                teacher_id: role_id,
                department: department.clone(),
            }),
        };
        Ok(profile)
    }

    fn sequence(&mut self, role: Role) -> &mut Sequence {
        match role {
            Role::Teacher => &mut self.teacher_ids,
            Role::Student | Role::Admin => &mut self.student_ids,
        }
    }

    /// Next sequence value not already held by a caller-supplied identifier.
    fn next_free_id(&mut self, role: Role) -> Result<i32, UserPersistenceError> {
        loop {
            let candidate = self.sequence(role).next().ok_or_else(|| {
                UserPersistenceError::provisioning(format!("{role} identifiers exhausted"))
            })?;
            if !self.role_id_taken(role, candidate) {
                return Ok(candidate);
            }
        }
    }

    fn account(&self, stored: &StoredUser) -> Result<Account, UserPersistenceError> {
        let profile = self.profiles.get(&stored.user.id().get()).cloned();
        Account::new(stored.user.clone(), profile)
            .map_err(|err| UserPersistenceError::query(err.to_string()))
    }
}

/// Mutex-guarded implementation of the user store port.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<StoreState>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next profile write fail, rolling back its registration.
    pub fn fail_next_provisioning(&self) -> Result<(), UserPersistenceError> {
        self.lock()?.fail_next_provisioning = true;
        Ok(())
    }

    /// Number of stored users.
    pub fn user_count(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.users.len())
    }

    /// Number of stored profiles across both roles.
    pub fn profile_count(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.profiles.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, UserPersistenceError> {
        self.state
            .lock()
            .map_err(|_| UserPersistenceError::query("in-memory user store poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn register(&self, account: &NewAccount) -> Result<Account, UserPersistenceError> {
        let mut state = self.lock()?;
        if let Some(field) = state.identity_taken(account) {
            return Err(UserPersistenceError::duplicate_identity(field));
        }

        let raw_id = state.last_user_id + 1;
        let user_id =
            UserId::new(raw_id).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let profile = account
            .profile
            .as_ref()
            .map(|draft| state.draft_profile(user_id, draft))
            .transpose()?;

        let user = User::new(
            user_id,
            account.username.clone(),
            account.email.clone(),
            account.role,
        )
        .with_names(account.names.clone());
        let created = Account::new(user.clone(), profile.clone())
            .map_err(|err| UserPersistenceError::provisioning(err.to_string()))?;

        state.last_user_id = raw_id;
        state.users.insert(
            raw_id,
            StoredUser {
                user,
                password_hash: account.password_hash.clone(),
            },
        );
        if let Some(profile) = profile {
            state.profiles.insert(raw_id, profile);
        }
        debug!(user_id = raw_id, role = %account.role, "user and profile stored in memory");
        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .users
            .get(&id.get())
            .map(|stored| stored.user.clone()))
    }

    async fn find_account(&self, id: UserId) -> Result<Option<Account>, UserPersistenceError> {
        let state = self.lock()?;
        state
            .users
            .get(&id.get())
            .map(|stored| state.account(stored))
            .transpose()
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|stored| stored.user.username().as_ref() == username)
            .map(|stored| StoredCredentials {
                user: stored.user.clone(),
                password_hash: stored.password_hash.clone(),
            }))
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .users
            .values()
            .filter(|stored| stored.user.role() == role)
            .map(|stored| stored.user.clone())
            .collect())
    }
}

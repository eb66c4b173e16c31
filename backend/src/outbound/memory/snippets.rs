//! In-memory snippet store.
//!
//! Owners are resolved through the user store on create, standing in for the
//! foreign key the PostgreSQL schema enforces.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::domain::ports::{
    SnippetPersistenceError, SnippetRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Snippet, SnippetDraft, SnippetId, SnippetOwner, UserId};

#[derive(Debug, Default)]
struct SnippetState {
    snippets: BTreeMap<SnippetId, Snippet>,
    last_id: i64,
}

/// Mutex-guarded implementation of the snippet store port.
pub struct InMemorySnippetRepository<U> {
    users: Arc<U>,
    state: Mutex<SnippetState>,
}

impl<U> InMemorySnippetRepository<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self {
            users,
            state: Mutex::new(SnippetState::default()),
        }
    }

    /// Number of stored snippets.
    pub fn snippet_count(&self) -> Result<usize, SnippetPersistenceError> {
        Ok(self.lock()?.snippets.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, SnippetState>, SnippetPersistenceError> {
        self.state
            .lock()
            .map_err(|_| SnippetPersistenceError::query("in-memory snippet store poisoned"))
    }
}

fn map_user_error(error: UserPersistenceError) -> SnippetPersistenceError {
    match error {
        UserPersistenceError::Connection { message } => {
            SnippetPersistenceError::connection(message)
        }
        other => SnippetPersistenceError::query(other.to_string()),
    }
}

fn apply(snippet: &mut Snippet, draft: &SnippetDraft) {
    snippet.title = draft.title().to_owned();
    snippet.code = draft.code().to_owned();
    snippet.lineos = draft.lineos();
    snippet.language = draft.language();
    snippet.style = draft.style();
}

#[async_trait]
impl<U: UserRepository> SnippetRepository for InMemorySnippetRepository<U> {
    async fn create(
        &self,
        owner: UserId,
        draft: &SnippetDraft,
    ) -> Result<Snippet, SnippetPersistenceError> {
        let user = self
            .users
            .find_by_id(owner)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| SnippetPersistenceError::unknown_owner(owner))?;

        let mut state = self.lock()?;
        let raw_id = state.last_id + 1;
        let id = SnippetId::new(raw_id)
            .map_err(|err| SnippetPersistenceError::query(err.to_string()))?;
        let snippet = Snippet {
            id,
            title: draft.title().to_owned(),
            code: draft.code().to_owned(),
            lineos: draft.lineos(),
            language: draft.language(),
            style: draft.style(),
            owner: SnippetOwner {
                id: owner,
                username: user.username().clone(),
            },
            created_at: Utc::now(),
        };
        state.last_id = raw_id;
        state.snippets.insert(id, snippet.clone());
        debug!(snippet_id = raw_id, owner_id = %owner, "snippet stored in memory");
        Ok(snippet)
    }

    async fn list(&self) -> Result<Vec<Snippet>, SnippetPersistenceError> {
        Ok(self.lock()?.snippets.values().cloned().collect())
    }

    async fn find(&self, id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError> {
        Ok(self.lock()?.snippets.get(&id).cloned())
    }

    async fn replace(
        &self,
        id: SnippetId,
        draft: &SnippetDraft,
    ) -> Result<Option<Snippet>, SnippetPersistenceError> {
        let mut state = self.lock()?;
        Ok(state.snippets.get_mut(&id).map(|snippet| {
            apply(snippet, draft);
            snippet.clone()
        }))
    }

    async fn delete(&self, id: SnippetId) -> Result<bool, SnippetPersistenceError> {
        Ok(self.lock()?.snippets.remove(&id).is_some())
    }
}

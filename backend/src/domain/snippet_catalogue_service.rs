//! Snippet management over the snippet store.
//!
//! Writes check ownership against the stored snippet before touching it, so
//! a caller can never overwrite or delete someone else's work unless they
//! hold the admin role.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{SnippetCatalogue, SnippetPersistenceError, SnippetRepository};
use crate::domain::{Error, Principal, Role, Snippet, SnippetDraft, SnippetId};

/// Snippet catalogue backed by the snippet store.
#[derive(Clone)]
pub struct SnippetCatalogueService<S> {
    snippets: Arc<S>,
}

impl<S> SnippetCatalogueService<S> {
    pub fn new(snippets: Arc<S>) -> Self {
        Self { snippets }
    }
}

fn missing(id: SnippetId) -> Error {
    Error::not_found(format!("snippet {id} does not exist"))
}

impl<S: SnippetRepository> SnippetCatalogueService<S> {
    fn map_persistence_error(error: SnippetPersistenceError) -> Error {
        match error {
            SnippetPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("snippet repository unavailable: {message}"))
            }
            SnippetPersistenceError::UnknownOwner { .. } => {
                Error::not_found("account no longer exists")
            }
            other => Error::internal(format!("snippet repository error: {other}")),
        }
    }

    /// Load `id` and confirm the caller may modify it.
    async fn writable(&self, caller: &Principal, id: SnippetId) -> Result<Snippet, Error> {
        let snippet = self
            .snippets
            .find(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| missing(id))?;
        if !snippet.writable_by(caller.user_id, caller.role == Role::Admin) {
            warn!(
                user_id = %caller.user_id,
                snippet_id = %id,
                owner_id = %snippet.owner.id,
                "snippet write denied"
            );
            return Err(Error::forbidden("only the owner may change this snippet"));
        }
        Ok(snippet)
    }
}

#[async_trait]
impl<S: SnippetRepository> SnippetCatalogue for SnippetCatalogueService<S> {
    async fn list(&self) -> Result<Vec<Snippet>, Error> {
        self.snippets
            .list()
            .await
            .map_err(Self::map_persistence_error)
    }

    async fn get(&self, id: SnippetId) -> Result<Snippet, Error> {
        self.snippets
            .find(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| missing(id))
    }

    async fn create(&self, caller: &Principal, draft: SnippetDraft) -> Result<Snippet, Error> {
        let snippet = self
            .snippets
            .create(caller.user_id, &draft)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(user_id = %caller.user_id, snippet_id = %snippet.id, "snippet created");
        Ok(snippet)
    }

    async fn replace(
        &self,
        caller: &Principal,
        id: SnippetId,
        draft: SnippetDraft,
    ) -> Result<Snippet, Error> {
        self.writable(caller, id).await?;
        self.snippets
            .replace(id, &draft)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| missing(id))
    }

    async fn delete(&self, caller: &Principal, id: SnippetId) -> Result<(), Error> {
        self.writable(caller, id).await?;
        let deleted = self
            .snippets
            .delete(id)
            .await
            .map_err(Self::map_persistence_error)?;
        if !deleted {
            return Err(missing(id));
        }
        info!(user_id = %caller.user_id, snippet_id = %id, "snippet deleted");
        Ok(())
    }
}

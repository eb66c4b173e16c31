//! Port abstraction for the snippet store and its errors.

use async_trait::async_trait;

use crate::domain::{Snippet, SnippetDraft, SnippetId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by snippet repository adapters.
    pub enum SnippetPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "snippet repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "snippet repository query failed: {message}",
        /// The owning user does not exist.
        UnknownOwner { owner: UserId } => "snippet owner {owner} does not exist",
    }
}

/// Port for the snippet store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetRepository: Send + Sync {
    /// Store a new snippet owned by `owner`.
    async fn create(
        &self,
        owner: UserId,
        draft: &SnippetDraft,
    ) -> Result<Snippet, SnippetPersistenceError>;

    /// Every snippet, oldest first.
    async fn list(&self) -> Result<Vec<Snippet>, SnippetPersistenceError>;

    /// Fetch one snippet.
    async fn find(&self, id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError>;

    /// Overwrite the contents of a snippet, keeping its owner and creation
    /// time. `None` when it does not exist.
    async fn replace(
        &self,
        id: SnippetId,
        draft: &SnippetDraft,
    ) -> Result<Option<Snippet>, SnippetPersistenceError>;

    /// Remove a snippet, reporting whether it existed.
    async fn delete(&self, id: SnippetId) -> Result<bool, SnippetPersistenceError>;
}

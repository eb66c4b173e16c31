//! Driving port for snippet management.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Snippet, SnippetDraft, SnippetId};

/// Domain use-case port for reading and writing snippets.
///
/// Any authenticated caller may read; only the owner or an admin may change
/// or delete a snippet.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SnippetCatalogue: Send + Sync {
    async fn list(&self) -> Result<Vec<Snippet>, Error>;

    async fn get(&self, id: SnippetId) -> Result<Snippet, Error>;

    /// Store `draft` with the caller as owner.
    async fn create(&self, caller: &Principal, draft: SnippetDraft) -> Result<Snippet, Error>;

    async fn replace(
        &self,
        caller: &Principal,
        id: SnippetId,
        draft: SnippetDraft,
    ) -> Result<Snippet, Error>;

    async fn delete(&self, caller: &Principal, id: SnippetId) -> Result<(), Error>;
}

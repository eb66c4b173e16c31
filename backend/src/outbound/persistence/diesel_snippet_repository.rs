//! PostgreSQL-backed `SnippetRepository` implementation using Diesel ORM.
//!
//! Reads join `users` for the owner's name. Listings are ordered by creation
//! time, with the identifier breaking ties.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{SnippetPersistenceError, SnippetRepository};
use crate::domain::{Snippet, SnippetDraft, SnippetId, UserId};

use super::diesel_error_mapping::{map_snippet_error, map_snippet_pool_error};
use super::models::{NewSnippetRow, SnippetChanges, SnippetRow};
use super::pool::DbPool;
use super::schema::{snippets, users};

/// Diesel-backed implementation of the snippet store port.
#[derive(Clone)]
pub struct DieselSnippetRepository {
    pool: DbPool,
}

impl DieselSnippetRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type SnippetWithOwner = (SnippetRow, String);

fn into_snippet((row, owner_name): SnippetWithOwner) -> Result<Snippet, SnippetPersistenceError> {
    row.into_snippet(&owner_name)
        .map_err(|err| SnippetPersistenceError::query(err.to_string()))
}

async fn load(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<Snippet>, SnippetPersistenceError> {
    snippets::table
        .inner_join(users::table)
        .filter(snippets::id.eq(id))
        .select((SnippetRow::as_select(), users::username))
        .first::<SnippetWithOwner>(conn)
        .await
        .optional()
        .map_err(|err| map_snippet_error(err, None))?
        .map(into_snippet)
        .transpose()
}

#[async_trait]
impl SnippetRepository for DieselSnippetRepository {
    async fn create(
        &self,
        owner: UserId,
        draft: &SnippetDraft,
    ) -> Result<Snippet, SnippetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_snippet_pool_error)?;
        let id = diesel::insert_into(snippets::table)
            .values(&NewSnippetRow {
                changes: SnippetChanges::from(draft),
                owner_id: owner.get(),
                created_at: Utc::now(),
            })
            .returning(snippets::id)
            .get_result::<i64>(&mut conn)
            .await
            .map_err(|err| map_snippet_error(err, Some(owner)))?;
        debug!(snippet_id = id, owner_id = %owner, "snippet inserted");

        // The owner can be deleted between the insert and the read back.
        load(&mut conn, id)
            .await?
            .ok_or_else(|| SnippetPersistenceError::unknown_owner(owner))
    }

    async fn list(&self) -> Result<Vec<Snippet>, SnippetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_snippet_pool_error)?;
        snippets::table
            .inner_join(users::table)
            .order((snippets::created_at.asc(), snippets::id.asc()))
            .select((SnippetRow::as_select(), users::username))
            .load::<SnippetWithOwner>(&mut conn)
            .await
            .map_err(|err| map_snippet_error(err, None))?
            .into_iter()
            .map(into_snippet)
            .collect()
    }

    async fn find(&self, id: SnippetId) -> Result<Option<Snippet>, SnippetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_snippet_pool_error)?;
        load(&mut conn, id.get()).await
    }

    async fn replace(
        &self,
        id: SnippetId,
        draft: &SnippetDraft,
    ) -> Result<Option<Snippet>, SnippetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_snippet_pool_error)?;
        let updated = diesel::update(snippets::table.find(id.get()))
            .set(&SnippetChanges::from(draft))
            .execute(&mut conn)
            .await
            .map_err(|err| map_snippet_error(err, None))?;
        if updated == 0 {
            return Ok(None);
        }
        load(&mut conn, id.get()).await
    }

    async fn delete(&self, id: SnippetId) -> Result<bool, SnippetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_snippet_pool_error)?;
        let deleted = diesel::delete(snippets::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_snippet_error(err, None))?;
        Ok(deleted > 0)
    }
}

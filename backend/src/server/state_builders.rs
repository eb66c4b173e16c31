//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{CredentialHashError, SnippetRepository, UserRepository};
use crate::domain::{
    AccountRegistrationService, CredentialLoginService, RoleDirectoryService,
    SnippetCatalogueService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemorySnippetRepository, InMemoryUserRepository};
use crate::outbound::persistence::{DieselSnippetRepository, DieselUserRepository};
use crate::outbound::security::{Argon2CredentialHasher, JwtTokenService};

use super::ServerConfig;

/// Wire the domain services over the user and snippet stores, hasher and
/// token service.
///
/// The account services share the same adapter instances.
pub fn build_http_state<R, S>(
    users: Arc<R>,
    snippets: Arc<S>,
    hasher: Arc<Argon2CredentialHasher>,
    tokens: Arc<JwtTokenService>,
) -> HttpState
where
    R: UserRepository + 'static,
    S: SnippetRepository + 'static,
{
    let registration = AccountRegistrationService::new(Arc::clone(&users), Arc::clone(&hasher));
    let login = CredentialLoginService::new(Arc::clone(&users), hasher, tokens);
    let directory = RoleDirectoryService::new(users);
    HttpState::new(HttpStatePorts {
        registration: Arc::new(registration),
        login: Arc::new(login),
        directory: Arc::new(directory),
        snippets: Arc::new(SnippetCatalogueService::new(snippets)),
    })
}

/// Build the HTTP state for `config`, choosing the store by pool presence.
pub(super) fn build_http_state_for(
    config: &ServerConfig,
) -> Result<HttpState, CredentialHashError> {
    let hasher = Arc::new(Argon2CredentialHasher::new()?);
    let tokens = Arc::new(JwtTokenService::new(
        &config.token_secret,
        config.token_lifetimes,
    ));

    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL user and snippet stores");
            build_http_state(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselSnippetRepository::new(pool.clone())),
                hasher,
                tokens,
            )
        }
        None => {
            warn!("no database configured; accounts are kept in memory and lost on restart");
            let users = Arc::new(InMemoryUserRepository::new());
            let snippets = Arc::new(InMemorySnippetRepository::new(Arc::clone(&users)));
            build_http_state(users, snippets, hasher, tokens)
        }
    };
    Ok(state)
}

//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_hasher;
mod login_service;
mod registration_service;
mod role_directory;
mod snippet_catalogue;
mod snippet_repository;
mod token_service;
mod user_repository;

#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use role_directory::MockRoleDirectory;
pub use role_directory::RoleDirectory;
#[cfg(test)]
pub use snippet_catalogue::MockSnippetCatalogue;
pub use snippet_catalogue::SnippetCatalogue;
#[cfg(test)]
pub use snippet_repository::MockSnippetRepository;
pub use snippet_repository::{SnippetPersistenceError, SnippetRepository};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    IdentityField, NewAccount, StoredCredentials, UserPersistenceError, UserRepository,
};

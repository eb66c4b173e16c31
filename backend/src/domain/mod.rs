//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, plus the services implementing the driving ports. Keep types
//! immutable and document invariants and serialisation contracts (serde) in
//! each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User, Role, Profile, Account: identity records.
//! - Snippet, SnippetDraft: user-owned code snippets.
//! - AccountRegistrationService, CredentialLoginService,
//!   RoleDirectoryService, SnippetCatalogueService: driving port
//!   implementations.

pub mod auth;
pub mod credential_login_service;
pub mod error;
pub mod password_policy;
pub mod ports;
pub mod profile;
pub mod provisioning;
pub mod registration;
pub mod registration_service;
pub mod role;
pub mod role_directory_service;
pub mod snippet;
pub mod snippet_catalogue_service;
pub mod trace_id;
pub mod user;

pub use self::auth::{
    IssuedTokens, LoginCredentials, LoginOutcome, LoginValidationError, Principal, TokenClaims,
    TokenKind,
};
pub use self::credential_login_service::CredentialLoginService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password_policy::{PASSWORD_MIN_LENGTH, WeakPasswordReason, check_password};
pub use self::profile::{
    Account, AccountInvariantError, PROFILE_FIELD_MAX, Profile, StudentProfile, TeacherProfile,
};
pub use self::provisioning::{ProfileDraft, ProvisioningValidationError, RoleFields};
pub use self::registration::{
    RegistrationParts, RegistrationRequest, RegistrationValidationError,
};
pub use self::registration_service::AccountRegistrationService;
pub use self::role::{Role, RoleParseError};
pub use self::role_directory_service::RoleDirectoryService;
pub use self::snippet::{
    ChoiceParseError, InvalidSnippetId, Language, SNIPPET_TITLE_KEYWORD, SNIPPET_TITLE_MAX,
    Snippet, SnippetDraft, SnippetId, SnippetOwner, SnippetParts, SnippetValidationError, Style,
};
pub use self::snippet_catalogue_service::SnippetCatalogueService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, Email, NAME_MAX, PersonalNames, USERNAME_MAX, User, UserId, UserValidationError,
    Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use campus_auth::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

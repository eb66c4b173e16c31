//! Campus account service: role-based registration with profile
//! provisioning, JWT login, role-scoped queries and owner-scoped code
//! snippets.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod registration;
pub mod schemas;
pub mod snippets;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod tokens;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(registration::register)
        .service(tokens::obtain_token)
        .service(tokens::login)
        .service(tokens::refresh_token)
        .service(users::current_profile)
        .service(users::protected_greeting)
        .service(users::list_users_by_role)
        .service(snippets::list_snippets)
        .service(snippets::create_snippet)
        .service(snippets::get_snippet)
        .service(snippets::replace_snippet)
        .service(snippets::delete_snippet);
}

/// JSON extractor configuration returning the standard error envelope for
/// malformed bodies.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        crate::domain::Error::invalid_request(message)
            .with_details(serde_json::json!({ "code": "malformed_body" }))
            .into()
    })
}

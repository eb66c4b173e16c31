//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::web;
use serde_json::Value;

use crate::domain::Error;
use crate::domain::ports::{
    MockLoginService, MockRegistrationService, MockRoleDirectory, MockSnippetCatalogue,
};

use super::state::{HttpState, HttpStatePorts};

/// Build handler state from mocked driving ports; snippets are unused.
pub fn state_with(
    registration: MockRegistrationService,
    login: MockLoginService,
    directory: MockRoleDirectory,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(HttpStatePorts {
        registration: Arc::new(registration),
        login: Arc::new(login),
        directory: Arc::new(directory),
        snippets: Arc::new(MockSnippetCatalogue::new()),
    }))
}

/// State for the snippet handlers: authentication plus the catalogue.
pub fn state_with_snippets(
    login: MockLoginService,
    snippets: MockSnippetCatalogue,
) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(HttpStatePorts {
        registration: Arc::new(MockRegistrationService::new()),
        login: Arc::new(login),
        directory: Arc::new(MockRoleDirectory::new()),
        snippets: Arc::new(snippets),
    }))
}

/// State whose only configured port is the login service.
pub fn state_with_login(login: MockLoginService) -> web::Data<HttpState> {
    state_with(
        MockRegistrationService::new(),
        login,
        MockRoleDirectory::new(),
    )
}

/// Decode an error response body, checking the envelope fields on the way.
pub fn error_from_envelope(body: &[u8], status: StatusCode) -> Error {
    let mut value: Value = serde_json::from_slice(body).expect("JSON error body");
    let object = value.as_object_mut().expect("error body is an object");
    assert_eq!(object.remove("error"), Some(Value::Bool(true)));
    assert_eq!(
        object.remove("statusCode"),
        Some(Value::from(status.as_u16()))
    );
    serde_json::from_value(value).expect("domain error payload")
}

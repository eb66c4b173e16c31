//! HTTP rendering of domain errors.
//!
//! Every failure leaves the service as the same JSON envelope: the domain
//! [`Error`] fields plus `statusCode` and `error: true`. Internal errors are
//! redacted before they reach clients, and every 404 carries one fixed
//! message so missing resources cannot be told apart by wording.

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Client-facing message for every 404 response.
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Rebuild `error` with a client-safe message, keeping its correlation id.
fn replace_message(error: &Error, message: &str) -> Error {
    let replaced = Error::new(error.code(), message);
    match error.trace_id() {
        Some(id) => replaced.with_trace_id(id.to_owned()),
        None => replaced,
    }
}

/// The payload clients may see for `error`.
fn client_payload(error: &Error) -> Error {
    match error.code() {
        ErrorCode::InternalError => {
            error!(message = error.message(), "internal error returned to client");
            replace_message(error, INTERNAL_MESSAGE)
        }
        ErrorCode::NotFound => {
            debug!(message = error.message(), "not found returned to client");
            let payload = replace_message(error, NOT_FOUND_MESSAGE);
            match error.details() {
                Some(details) => payload.with_details(details.clone()),
                None => payload,
            }
        }
        _ => error.clone(),
    }
}

/// Wire shape of every error response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    #[serde(flatten)]
    payload: Error,
    status_code: u16,
    #[serde(rename = "error")]
    is_error: bool,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorEnvelope {
            payload: client_payload(self),
            status_code: status.as_u16(),
            is_error: true,
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

/// Fallback for requests no route matched.
pub async fn unmatched_route(request: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "no route for {} {}",
        request.method(),
        request.path()
    )))
}

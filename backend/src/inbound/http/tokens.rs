//! Token API handlers.
//!
//! ```text
//! POST /api/v1/token/ {"username":"alice","password":"Str0ng!Pass"}
//! POST /api/v1/login/ {"username":"alice","password":"Str0ng!Pass"}
//! POST /api/v1/token/refresh/ {"refresh":"<token>"}
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginOutcome, LoginValidationError, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RoleSchema};
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "Str0ng!Pass")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Access and refresh tokens with the identity they were issued for.
#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(value_type = RoleSchema)]
    pub role: Role,
    /// Snake case, unlike the rest of the payload.
    #[serde(rename = "user_id")]
    #[schema(rename = "user_id", example = 42)]
    pub user_id: i64,
}

impl From<LoginOutcome> for TokenPairResponse {
    fn from(outcome: LoginOutcome) -> Self {
        let LoginOutcome { user, tokens } = outcome;
        Self {
            access: tokens.access,
            refresh: tokens.refresh,
            username: user.username().to_string(),
            email: user.email().to_string(),
            role: user.role(),
            user_id: user.id().get(),
        }
    }
}

/// Refresh request body.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Freshly issued access token.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AccessTokenResponse {
    pub access: String,
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

async fn issue_tokens(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenPairResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(web::Json(outcome.into()))
}

/// Exchange a username and password for an access and refresh token pair.
///
/// Unknown users and wrong passwords produce the same 401 response.
#[utoipa::path(
    post,
    path = "/api/v1/token/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPairResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["tokens"],
    operation_id = "obtainToken",
    security([])
)]
#[post("/token/")]
pub async fn obtain_token(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenPairResponse>> {
    issue_tokens(state, payload).await
}

/// Alias of `POST /api/v1/token/`.
#[utoipa::path(
    post,
    path = "/api/v1/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPairResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["tokens"],
    operation_id = "login",
    security([])
)]
#[post("/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenPairResponse>> {
    issue_tokens(state, payload).await
}

/// Exchange a refresh token for a new access token built from the current
/// user record.
#[utoipa::path(
    post,
    path = "/api/v1/token/refresh/",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Access token issued", body = AccessTokenResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["tokens"],
    operation_id = "refreshToken",
    security([])
)]
#[post("/token/refresh/")]
pub async fn refresh_token(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<AccessTokenResponse>> {
    let access = state.login.refresh(payload.refresh.trim()).await?;
    Ok(web::Json(AccessTokenResponse { access }))
}

#[cfg(test)]
#[path = "tokens_tests.rs"]
mod tests;

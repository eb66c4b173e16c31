//! Authenticated user endpoints.
//!
//! ```text
//! GET /api/v1/profile/
//! GET /api/v1/protected/
//! GET /api/v1/roles/STUDENT/users
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Account, Error, Profile, Role, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{ErrorSchema, ProfileSchema, RoleSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// The caller's account and role profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = RoleSchema)]
    pub role: Role,
    /// `null` for admin accounts.
    #[schema(value_type = Option<ProfileSchema>)]
    pub profile: Option<Profile>,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        let (user, profile) = account.into_parts();
        Self {
            id: user.id().get(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            first_name: user.names().first_name().to_owned(),
            last_name: user.names().last_name().to_owned(),
            role: user.role(),
            profile,
        }
    }
}

/// Greeting returned by the protected endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GreetingResponse {
    #[schema(example = "Hello, alice")]
    pub message: String,
}

/// Return the caller's account with its role profile.
#[utoipa::path(
    get,
    path = "/api/v1/profile/",
    responses(
        (status = 200, description = "Caller profile", body = ProfileResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentProfile"
)]
#[get("/profile/")]
pub async fn current_profile(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<ProfileResponse>> {
    let account = state.directory.own_account(caller.principal()).await?;
    Ok(web::Json(account.into()))
}

/// Greet the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/protected/",
    responses(
        (status = 200, description = "Greeting", body = GreetingResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "protectedGreeting"
)]
#[get("/protected/")]
pub async fn protected_greeting(caller: AuthenticatedUser) -> web::Json<GreetingResponse> {
    web::Json(GreetingResponse {
        message: format!("Hello, {}", caller.principal().username),
    })
}

fn parse_role(raw: &str) -> Result<Role, Error> {
    raw.parse::<Role>().map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "role", "code": "invalid_role" }))
    })
}

/// List every user holding `role`, ordered by id.
///
/// Restricted to admin and teacher callers.
#[utoipa::path(
    get,
    path = "/api/v1/roles/{role}/users",
    params(("role" = String, Path, description = "ADMIN, STUDENT or TEACHER, case-insensitive")),
    responses(
        (status = 200, description = "Users holding the role", body = [UserSchema]),
        (status = 400, description = "Unknown role", body = ErrorSchema),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 403, description = "Caller may not list users", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsersByRole"
)]
#[get("/roles/{role}/users")]
pub async fn list_users_by_role(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    role: web::Path<String>,
) -> ApiResult<web::Json<Vec<User>>> {
    let role = parse_role(&role)?;
    let users = state
        .directory
        .users_with_role(caller.principal(), role)
        .await?;
    Ok(web::Json(users))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

//! Registration API handler.
//!
//! ```text
//! POST /api/v1/register/student/ {"username":"alice","email":"a@x.com","password":"Str0ng!Pass"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, RegistrationParts, RegistrationRequest, RegistrationValidationError, Role, RoleFields,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, RoleSchema};
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/register/{role}/`.
///
/// `studentId`/`programme` apply to student registrations and
/// `teacherId`/`department` to teacher registrations; the other role's
/// fields are rejected.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Str0ng!Pass")]
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<i32>,
    #[serde(default)]
    pub programme: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<i32>,
    #[serde(default)]
    pub department: Option<String>,
}

impl RegisterRequest {
    fn into_request(self, role: &str) -> Result<RegistrationRequest, RegistrationValidationError> {
        let parts = RegistrationParts {
            role,
            username: &self.username,
            email: &self.email,
            password: &self.password,
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
        };
        let role_fields = RoleFields {
            student_id: self.student_id,
            programme: self.programme,
            teacher_id: self.teacher_id,
            department: self.department,
        };
        RegistrationRequest::try_from_parts(parts, role_fields)
    }
}

/// Body of a successful registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(rename_all = "camelCase")]
pub struct RegisteredResponse {
    #[schema(example = 42)]
    pub user_id: i64,
    #[schema(value_type = RoleSchema)]
    pub role: Role,
}

pub(crate) fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

/// Register a student or teacher account together with its profile.
#[utoipa::path(
    post,
    path = "/api/v1/register/{role}/",
    params(("role" = String, Path, description = "STUDENT or TEACHER, case-insensitive")),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account and profile created", body = RegisteredResponse),
        (status = 400, description = "Invalid role, field, weak password or duplicate identity", body = ErrorSchema),
        (status = 500, description = "Profile provisioning failed", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["registration"],
    operation_id = "register",
    security([])
)]
#[post("/register/{role}/")]
pub async fn register(
    state: web::Data<HttpState>,
    role: web::Path<String>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload
        .into_inner()
        .into_request(&role)
        .map_err(map_registration_validation_error)?;
    let account = state.registration.register(request).await?;
    let user = account.user();
    Ok(HttpResponse::Created().json(RegisteredResponse {
        user_id: user.id().get(),
        role: user.role(),
    }))
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;

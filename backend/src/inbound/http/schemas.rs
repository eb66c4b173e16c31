//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their serialised shape and register under the domain
//! type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The user store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "an account with this username already exists")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending `field` and a `code`.
    details: Option<serde_json::Value>,
    /// HTTP status of the response, repeated in the body.
    #[schema(example = 400)]
    status_code: u16,
    /// Always `true`.
    #[schema(example = true)]
    error: bool,
}

/// OpenAPI schema for [`crate::domain::Role`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Role)]
pub enum RoleSchema {
    #[schema(rename = "ADMIN")]
    Admin,
    #[schema(rename = "STUDENT")]
    Student,
    #[schema(rename = "TEACHER")]
    Teacher,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 42)]
    id: i64,
    #[schema(example = "alice")]
    username: String,
    #[schema(example = "a@x.com")]
    email: String,
    role: RoleSchema,
    #[schema(example = "Alice")]
    first_name: String,
    #[schema(example = "")]
    last_name: String,
}

/// OpenAPI schema for [`crate::domain::Profile`].
///
/// Student profiles carry `studentId` and `programme`; teacher profiles carry
/// `teacherId` and `department`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Profile, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProfileSchema {
    #[schema(example = 42)]
    user_id: i64,
    #[schema(example = 1)]
    student_id: Option<i32>,
    #[schema(example = "Physics")]
    programme: Option<String>,
    teacher_id: Option<i32>,
    department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"));
        assert!(json.contains("statusCode"));
        assert!(!json.contains("trace_id"));
    }

    #[rstest]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }

    #[rstest]
    fn role_schema_uses_upper_case_tags() {
        let json = schema_to_json::<RoleSchema>();
        for tag in ["ADMIN", "STUDENT", "TEACHER"] {
            assert!(json.contains(tag), "missing {tag}");
        }
    }

    #[rstest]
    fn user_schema_never_exposes_credentials() {
        let json = schema_to_json::<UserSchema>();
        assert!(json.contains("firstName"));
        assert!(!json.contains("password"));
    }
}

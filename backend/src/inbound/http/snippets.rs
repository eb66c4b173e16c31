//! Snippet API handlers.
//!
//! ```text
//! GET    /api/v1/snippets/
//! POST   /api/v1/snippets/ {"title":"Django views","code":"print('hi')"}
//! GET    /api/v1/snippets/7/
//! PUT    /api/v1/snippets/7/
//! DELETE /api/v1/snippets/7/
//! ```
//!
//! Every route requires a bearer token. Reads are open to any authenticated
//! caller; writes are limited to the owner and admins.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Error, Language, Snippet, SnippetDraft, SnippetId, SnippetParts, SnippetValidationError, Style,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Snippet body for create and full replacement.
///
/// Omitted options take their defaults, including on `PUT`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SnippetRequest {
    #[schema(example = "Django views")]
    #[serde(default)]
    pub title: Option<String>,
    #[schema(example = "def index(request): ...")]
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub lineos: Option<bool>,
    /// `python` (default) or `javascript`.
    #[schema(example = "python")]
    #[serde(default)]
    pub language: Option<String>,
    /// `friendly` (default) or `monokai`; JavaScript needs `monokai`.
    #[schema(example = "friendly")]
    #[serde(default)]
    pub style: Option<String>,
}

impl SnippetRequest {
    fn into_draft(self) -> Result<SnippetDraft, SnippetValidationError> {
        SnippetDraft::try_from_parts(SnippetParts {
            title: self.title.as_deref(),
            code: self.code.as_deref(),
            lineos: self.lineos,
            language: self.language.as_deref(),
            style: self.style.as_deref(),
        })
    }
}

/// Owner summary embedded in each snippet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnippetOwnerResponse {
    #[schema(example = 42)]
    pub id: i64,
    #[schema(example = "alice")]
    pub username: String,
}

/// A stored snippet as returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SnippetResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "Django views")]
    pub title: String,
    pub code: String,
    pub lineos: bool,
    #[schema(value_type = String, example = "python")]
    pub language: Language,
    #[schema(value_type = String, example = "friendly")]
    pub style: Style,
    pub owner: SnippetOwnerResponse,
}

impl From<Snippet> for SnippetResponse {
    fn from(snippet: Snippet) -> Self {
        Self {
            id: snippet.id.get(),
            title: snippet.title,
            code: snippet.code,
            lineos: snippet.lineos,
            language: snippet.language,
            style: snippet.style,
            owner: SnippetOwnerResponse {
                id: snippet.owner.id.get(),
                username: snippet.owner.username.to_string(),
            },
        }
    }
}

pub(crate) fn map_snippet_validation_error(err: SnippetValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "code": err.code(),
    }))
}

/// Non-numeric or non-positive identifiers name no snippet.
fn parse_snippet_id(raw: &str) -> Result<SnippetId, Error> {
    raw.parse::<i64>()
        .ok()
        .and_then(|id| SnippetId::new(id).ok())
        .ok_or_else(|| Error::not_found(format!("snippet {raw} does not exist")))
}

/// List every snippet, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/snippets/",
    responses(
        (status = 200, description = "All snippets", body = [SnippetResponse]),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["snippets"],
    operation_id = "listSnippets"
)]
#[get("/snippets/")]
pub async fn list_snippets(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<SnippetResponse>>> {
    let snippets = state.snippets.list().await?;
    Ok(web::Json(
        snippets.into_iter().map(SnippetResponse::from).collect(),
    ))
}

/// Create a snippet owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/snippets/",
    request_body = SnippetRequest,
    responses(
        (status = 201, description = "Snippet created", body = SnippetResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema)
    ),
    tags = ["snippets"],
    operation_id = "createSnippet"
)]
#[post("/snippets/")]
pub async fn create_snippet(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<SnippetRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload
        .into_inner()
        .into_draft()
        .map_err(map_snippet_validation_error)?;
    let snippet = state.snippets.create(caller.principal(), draft).await?;
    Ok(HttpResponse::Created().json(SnippetResponse::from(snippet)))
}

/// Fetch one snippet.
#[utoipa::path(
    get,
    path = "/api/v1/snippets/{id}/",
    params(("id" = i64, Path, description = "Snippet identifier")),
    responses(
        (status = 200, description = "The snippet", body = SnippetResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 404, description = "No such snippet", body = ErrorSchema)
    ),
    tags = ["snippets"],
    operation_id = "getSnippet"
)]
#[get("/snippets/{id}/")]
pub async fn get_snippet(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    id: web::Path<String>,
) -> ApiResult<web::Json<SnippetResponse>> {
    let snippet = state.snippets.get(parse_snippet_id(&id)?).await?;
    Ok(web::Json(snippet.into()))
}

/// Replace a snippet's contents.
#[utoipa::path(
    put,
    path = "/api/v1/snippets/{id}/",
    params(("id" = i64, Path, description = "Snippet identifier")),
    request_body = SnippetRequest,
    responses(
        (status = 200, description = "Snippet replaced", body = SnippetResponse),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 403, description = "Caller does not own the snippet", body = ErrorSchema),
        (status = 404, description = "No such snippet", body = ErrorSchema)
    ),
    tags = ["snippets"],
    operation_id = "replaceSnippet"
)]
#[put("/snippets/{id}/")]
pub async fn replace_snippet(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<String>,
    payload: web::Json<SnippetRequest>,
) -> ApiResult<web::Json<SnippetResponse>> {
    let id = parse_snippet_id(&id)?;
    let draft = payload
        .into_inner()
        .into_draft()
        .map_err(map_snippet_validation_error)?;
    let snippet = state
        .snippets
        .replace(caller.principal(), id, draft)
        .await?;
    Ok(web::Json(snippet.into()))
}

/// Delete a snippet.
#[utoipa::path(
    delete,
    path = "/api/v1/snippets/{id}/",
    params(("id" = i64, Path, description = "Snippet identifier")),
    responses(
        (status = 204, description = "Snippet deleted"),
        (status = 401, description = "Invalid or expired token", body = ErrorSchema),
        (status = 403, description = "Caller does not own the snippet", body = ErrorSchema),
        (status = 404, description = "No such snippet", body = ErrorSchema)
    ),
    tags = ["snippets"],
    operation_id = "deleteSnippet"
)]
#[delete("/snippets/{id}/")]
pub async fn delete_snippet(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_snippet_id(&id)?;
    state.snippets.delete(caller.principal(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "snippets_tests.rs"]
mod tests;

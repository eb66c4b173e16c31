//! Tests for the snippet handlers.

use super::*;
use crate::domain::ports::{MockLoginService, MockSnippetCatalogue};
use crate::domain::{ErrorCode, Principal, Role, SnippetOwner, UserId, Username};
use crate::inbound::http::error::NOT_FOUND_MESSAGE;
use crate::inbound::http::test_utils::{error_from_envelope, state_with_snippets};
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::{Method, StatusCode};
use actix_web::{App, test as actix_test};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

const TOKEN: &str = "access-token";

fn authenticated_as(id: i64) -> MockLoginService {
    let mut login = MockLoginService::new();
    login.expect_authenticate().returning(move |token| {
        if token == TOKEN {
            Ok(Principal {
                user_id: UserId::new(id).expect("positive id"),
                username: "alice".to_owned(),
                role: Role::Student,
            })
        } else {
            Err(Error::unauthorized("invalid or expired token"))
        }
    });
    login
}

fn snippet(id: i64, title: &str) -> Snippet {
    Snippet {
        id: SnippetId::new(id).expect("positive id"),
        title: title.to_owned(),
        code: "print('hi')".to_owned(),
        lineos: false,
        language: Language::Python,
        style: Style::Friendly,
        owner: SnippetOwner {
            id: UserId::new(3).expect("positive id"),
            username: Username::new("alice").expect("valid username"),
        },
        created_at: Utc::now(),
    }
}

async fn call(
    snippets: MockSnippetCatalogue,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, actix_web::web::Bytes) {
    let state = state_with_snippets(authenticated_as(3), snippets);
    let app = actix_test::init_service(
        App::new().app_data(state).service(
            web::scope("/api/v1")
                .service(list_snippets)
                .service(create_snippet)
                .service(get_snippet)
                .service(replace_snippet)
                .service(delete_snippet),
        ),
    )
    .await;
    let mut request = actix_test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((AUTHORIZATION, format!("Bearer {TOKEN}")));
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    (status, actix_test::read_body(response).await)
}

fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("JSON body")
}

#[rstest]
#[actix_web::test]
async fn list_returns_snippets_with_owner_summary() {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_list()
        .return_once(|| Ok(vec![snippet(1, "Django one"), snippet(2, "Django two")]));

    let (status, body) = call(snippets, Method::GET, "/api/v1/snippets/", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = json_body(&body);
    assert_eq!(body[0]["title"], "Django one");
    assert_eq!(body[1]["id"], 2);
    assert_eq!(
        body[0]["owner"],
        json!({ "id": 3, "username": "alice" })
    );
    assert_eq!(body[0]["language"], "python");
    assert!(body[0].get("created_at").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_snippet() {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_create()
        .withf(|caller, draft| caller.user_id.get() == 3 && draft.title() == "Django views")
        .times(1)
        .return_once(|_, _| Ok(snippet(7, "Django views")));

    let (status, body) = call(
        snippets,
        Method::POST,
        "/api/v1/snippets/",
        Some(json!({ "title": "  Django views ", "code": "print('hi')" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body)["id"], 7);
}

#[rstest]
#[case(json!({ "title": "Flask views", "code": "x" }), "title", "title_missing_keyword")]
#[case(json!({ "code": "x" }), "title", "empty_title")]
#[case(json!({ "title": "Django", "code": "   " }), "code", "empty_code")]
#[case(json!({ "title": "Django", "code": "x", "language": "ruby" }), "language", "invalid_choice")]
#[case(
    json!({ "title": "Django", "code": "x", "language": "javascript" }),
    "style",
    "style_not_allowed"
)]
#[actix_web::test]
async fn invalid_payloads_report_field_and_code(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let mut snippets = MockSnippetCatalogue::new();
    snippets.expect_create().times(0);

    let (status, body) = call(snippets, Method::POST, "/api/v1/snippets/", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = error_from_envelope(&body, StatusCode::BAD_REQUEST);
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.details(), Some(&json!({ "field": field, "code": code })));
}

#[rstest]
#[case("/api/v1/snippets/99/")]
#[case("/api/v1/snippets/abc/")]
#[case("/api/v1/snippets/0/")]
#[actix_web::test]
async fn missing_snippets_use_the_fixed_not_found_message(#[case] uri: &str) {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_get()
        .returning(|id| Err(Error::not_found(format!("snippet {id} does not exist"))));

    let (status, body) = call(snippets, Method::GET, uri, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = error_from_envelope(&body, StatusCode::NOT_FOUND);
    assert_eq!(error.message(), NOT_FOUND_MESSAGE);
}

#[rstest]
#[actix_web::test]
async fn replace_passes_identifier_and_draft() {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_replace()
        .withf(|_, id, draft| id.get() == 7 && draft.style() == Style::Monokai)
        .times(1)
        .return_once(|_, _, _| Ok(snippet(7, "Django forms")));

    let (status, body) = call(
        snippets,
        Method::PUT,
        "/api/v1/snippets/7/",
        Some(json!({ "title": "Django forms", "code": "x", "style": "monokai" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)["title"], "Django forms");
}

#[rstest]
#[actix_web::test]
async fn delete_returns_no_content() {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_delete()
        .withf(|_, id| id.get() == 7)
        .return_once(|_, _| Ok(()));

    let (status, body) = call(snippets, Method::DELETE, "/api/v1/snippets/7/", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[rstest]
#[actix_web::test]
async fn writes_by_non_owners_are_forbidden() {
    let mut snippets = MockSnippetCatalogue::new();
    snippets
        .expect_delete()
        .return_once(|_, _| Err(Error::forbidden("only the owner may change this snippet")));

    let (status, body) = call(snippets, Method::DELETE, "/api/v1/snippets/7/", None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let error = error_from_envelope(&body, StatusCode::FORBIDDEN);
    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[actix_web::test]
async fn requests_without_a_token_are_rejected() {
    let state = state_with_snippets(authenticated_as(3), MockSnippetCatalogue::new());
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .service(web::scope("/api/v1").service(list_snippets)),
    )
    .await;
    let request = actix_test::TestRequest::get()
        .uri("/api/v1/snippets/")
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

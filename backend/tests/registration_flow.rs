//! End-to-end registration scenarios over the in-memory user store.
//!
//! Each test drives the assembled application through `actix_web::test`, so
//! routing, extractors, error mapping and the store all participate.

// Each suite uses a different subset of the shared helpers.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use futures::future::join_all;
use rstest::rstest;
use serde_json::json;

use campus_auth::server::build_app;
use support::{
    PASSWORD, TestBackend, authorised_get, json_response, login_request, register_request,
    registration_body,
};

#[rstest]
#[case("student", "STUDENT")]
#[case("TEACHER", "TEACHER")]
#[case("Student", "STUDENT")]
#[actix_web::test]
async fn registration_creates_user_and_profile_together(
    #[case] path_role: &str,
    #[case] expected_role: &str,
) {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;

    let (status, body) = json_response(
        test::call_service(
            &app,
            register_request(path_role, registration_body("alice")).to_request(),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], expected_role);
    assert!(body["userId"].as_i64().is_some_and(|id| id > 0));
    assert_eq!(backend.user_count(), 1);
    assert_eq!(backend.profile_count(), 1);
}

#[rstest]
#[case("admin")]
#[case("ADMIN")]
#[case("janitor")]
#[actix_web::test]
async fn non_registrable_roles_create_nothing(#[case] path_role: &str) {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;

    let (status, body) = json_response(
        test::call_service(
            &app,
            register_request(path_role, registration_body("mallory")).to_request(),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(backend.user_count(), 0);
}

#[rstest]
#[case("alice", "other@example.com", "username")]
#[case("someone", "alice@example.com", "email")]
#[actix_web::test]
async fn duplicate_identity_is_rejected_without_side_effects(
    #[case] username: &str,
    #[case] email: &str,
    #[case] field: &str,
) {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;
    let first = test::call_service(
        &app,
        register_request("student", registration_body("alice")).to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let (status, body) = json_response(
        test::call_service(
            &app,
            register_request(
                "teacher",
                json!({ "username": username, "email": email, "password": PASSWORD }),
            )
            .to_request(),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], "duplicate_identity");
    assert_eq!(backend.user_count(), 1);
    assert_eq!(backend.profile_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn concurrent_duplicates_admit_exactly_one() {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;

    let attempts = (0..6).map(|n| {
        let body = json!({
            "username": "racer",
            "email": format!("racer{n}@example.com"),
            "password": PASSWORD,
        });
        test::call_service(&app, register_request("student", body).to_request())
    });
    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .iter()
        .map(|response| response.status())
        .collect();

    let created = statuses
        .iter()
        .filter(|status| **status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1, "statuses: {statuses:?}");
    assert!(
        statuses
            .iter()
            .all(|status| matches!(*status, StatusCode::CREATED | StatusCode::BAD_REQUEST))
    );
    assert_eq!(backend.user_count(), 1);
    assert_eq!(backend.profile_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn failed_provisioning_rolls_back_the_user() {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;
    backend
        .repository
        .fail_next_provisioning()
        .expect("store writable");

    let (status, body) = json_response(
        test::call_service(
            &app,
            register_request("teacher", registration_body("bob")).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert_eq!(backend.user_count(), 0);
    assert_eq!(backend.profile_count(), 0);

    // The identity stays free for a retry.
    let retry = test::call_service(
        &app,
        register_request("teacher", registration_body("bob")).to_request(),
    )
    .await;
    assert_eq!(retry.status(), StatusCode::CREATED);
    assert_eq!(backend.user_count(), 1);
    assert_eq!(backend.profile_count(), 1);
}

#[rstest]
#[actix_web::test]
async fn weak_password_is_rejected_with_reasons() {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;

    let (status, body) = json_response(
        test::call_service(
            &app,
            register_request(
                "student",
                json!({ "username": "weakling", "email": "w@example.com", "password": "short" }),
            )
            .to_request(),
        )
        .await,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "weak_password");
    assert_eq!(backend.user_count(), 0);
}

#[rstest]
#[actix_web::test]
async fn role_listing_returns_only_matching_users_in_id_order() {
    let backend = TestBackend::new();
    let admin = backend.seed_admin("root").await;
    let app = test::init_service(build_app(backend.deps())).await;
    for (role, username) in [
        ("student", "s1"),
        ("teacher", "t1"),
        ("student", "s2"),
    ] {
        let response = test::call_service(
            &app,
            register_request(role, registration_body(username)).to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let (_, tokens) = json_response(
        test::call_service(
            &app,
            login_request("/api/v1/token/", "root", PASSWORD).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(tokens["user_id"], admin.id().get());
    let access = tokens["access"].as_str().expect("access token");

    let (status, students) = json_response(
        test::call_service(
            &app,
            authorised_get("/api/v1/roles/student/users", access).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let students = students.as_array().expect("array body");
    let names: Vec<&str> = students
        .iter()
        .map(|user| user["username"].as_str().expect("username"))
        .collect();
    assert_eq!(names, ["s1", "s2"]);
    assert!(students.iter().all(|user| user["role"] == "STUDENT"));

    let (_, admins) = json_response(
        test::call_service(
            &app,
            authorised_get("/api/v1/roles/ADMIN/users", access).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(admins.as_array().map(Vec::len), Some(1));
    assert_eq!(admins[0]["username"], "root");
}

#[rstest]
#[actix_web::test]
async fn students_may_not_list_users() {
    let backend = TestBackend::new();
    let app = test::init_service(build_app(backend.deps())).await;
    let created = test::call_service(
        &app,
        register_request("student", registration_body("alice")).to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let (_, tokens) = json_response(
        test::call_service(
            &app,
            login_request("/api/v1/login/", "alice", PASSWORD).to_request(),
        )
        .await,
    )
    .await;
    let access = tokens["access"].as_str().expect("access token");

    let (status, body) = json_response(
        test::call_service(
            &app,
            authorised_get("/api/v1/roles/teacher/users", access).to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

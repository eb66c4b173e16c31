//! Shared helpers for the end-to-end HTTP suites.
//!
//! Integration tests compile as separate crates, so each suite pulls this
//! module in with `mod support;` and uses the parts it needs.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::{Method, StatusCode, header};
use actix_web::{test, web};
use serde_json::{Value, json};

use campus_auth::domain::ports::{CredentialHasher, NewAccount, UserRepository};
use campus_auth::domain::{Email, PersonalNames, Role, User, Username};
use campus_auth::inbound::http::health::HealthState;
use campus_auth::outbound::memory::{InMemorySnippetRepository, InMemoryUserRepository};
use campus_auth::outbound::security::{Argon2CredentialHasher, JwtTokenService, TokenLifetimes};
use campus_auth::server::{AppDependencies, build_http_state};

pub const PASSWORD: &str = "Str0ng!Pass";
const SECRET: &[u8] = b"integration-test-secret";

/// Application wiring over inspectable in-memory stores.
pub struct TestBackend {
    pub repository: Arc<InMemoryUserRepository>,
    pub snippets: Arc<InMemorySnippetRepository<InMemoryUserRepository>>,
    hasher: Arc<Argon2CredentialHasher>,
    deps: AppDependencies,
}

impl TestBackend {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(Argon2CredentialHasher::new().expect("hasher initialises"));
        let tokens = Arc::new(JwtTokenService::new(
            SECRET,
            TokenLifetimes::default(),
        ));
        let snippets = Arc::new(InMemorySnippetRepository::new(Arc::clone(&repository)));
        let http_state = build_http_state(
            Arc::clone(&repository),
            Arc::clone(&snippets),
            Arc::clone(&hasher),
            tokens,
        );
        let deps = AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(http_state),
        };
        Self {
            repository,
            snippets,
            hasher,
            deps,
        }
    }

    pub fn deps(&self) -> AppDependencies {
        self.deps.clone()
    }

    /// Seed an admin account directly through the store; admins cannot
    /// self-register.
    pub async fn seed_admin(&self, username: &str) -> User {
        let password_hash = self.hasher.hash(PASSWORD).expect("hash admin password");
        let account = NewAccount {
            username: Username::new(username).expect("valid username"),
            email: Email::new(format!("{username}@example.com")).expect("valid email"),
            role: Role::Admin,
            names: PersonalNames::new(None, None).expect("empty names"),
            password_hash,
            profile: None,
        };
        self.repository
            .register(&account)
            .await
            .expect("admin seeded")
            .user()
            .clone()
    }

    pub fn user_count(&self) -> usize {
        self.repository.user_count().expect("store readable")
    }

    pub fn profile_count(&self) -> usize {
        self.repository.profile_count().expect("store readable")
    }

    pub fn snippet_count(&self) -> usize {
        self.snippets.snippet_count().expect("store readable")
    }
}

pub fn register_request(role: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/api/v1/register/{role}/"))
        .set_json(body)
}

pub fn registration_body(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
    })
}

pub fn login_request(path: &str, username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(path)
        .set_json(json!({ "username": username, "password": password }))
}

pub fn authorised_get(uri: &str, access: &str) -> test::TestRequest {
    authorised(Method::GET, uri, access)
}

pub fn authorised(method: Method, uri: &str, access: &str) -> test::TestRequest {
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {access}")))
}

/// Split a response into its status and JSON body.
pub async fn json_response<B: MessageBody>(response: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).expect("JSON body");
    (status, body)
}

/// Drop the per-request trace identifier so error bodies can be compared.
pub fn without_trace_id(mut body: Value) -> Value {
    if let Some(object) = body.as_object_mut() {
        object.remove("traceId");
    }
    body
}

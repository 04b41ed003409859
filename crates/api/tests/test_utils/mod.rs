#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::TestServer;
use clinic_api::{app, config::ApiConfig, middleware::auth::hash_password, ApiState};
use clinic_core::models::user::{AuthResponse, Role};
use clinic_db::{mock::InMemoryStore, Store};
use serde_json::json;

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config() -> ApiConfig {
    ApiConfig::from_vars(|key| match key {
        "DATABASE_URL" => Some("postgres://localhost:5432/clinic_test".to_string()),
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        _ => None,
    })
    .unwrap()
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = Arc::new(ApiState::new(store.clone(), &test_config()));
        let server = TestServer::new(app(state)).unwrap();

        Self { server, store }
    }

    /// Registers a patient and returns its token.
    pub async fn register_patient(&self, name: &str, email: &str) -> String {
        let response = self
            .server
            .post("/api/register")
            .json(&json!({ "name": name, "email": email, "password": "secret1" }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<AuthResponse>().token
    }

    /// Stores an administrator directly and logs it in.
    pub async fn admin_token(&self) -> String {
        let hash = hash_password("admin-pass").unwrap();
        self.store
            .upsert_user("Admin", "admin@clinic.test", &hash, Role::Admin)
            .await
            .unwrap();

        let response = self
            .server
            .post("/api/login")
            .json(&json!({ "email": "admin@clinic.test", "password": "admin-pass" }))
            .await;
        response.assert_status_ok();
        response.json::<AuthResponse>().token
    }
}

pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

pub fn forwarded_for(ip: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-forwarded-for"),
        HeaderValue::from_static(ip),
    )
}

/// Common test utilities for integration tests
///
/// Builds the full router over an in-memory store with one signed-up owner and
/// a valid access token, and drives it through `tower::Service::call`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use gymdesk_api::app::{build_router, AppState};
use gymdesk_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use gymdesk_shared::auth::jwt::issue_token_pair;
use gymdesk_shared::auth::password::hash_password;
use gymdesk_shared::models::owner::{CreateOwner, GymOwner};
use gymdesk_shared::store::{GymStore, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;

pub const JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const OWNER_PASSWORD: &str = "front-desk-2025";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
    pub config: Config,
    pub owner: GymOwner,
    pub jwt_token: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
    }
}

impl TestContext {
    /// Fresh store with one owner and an access token for that owner
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();
        let store = Arc::new(MemoryStore::new());

        let owner = store
            .insert_owner(CreateOwner {
                name: "Dana Reyes".to_string(),
                gym_name: "Iron Works".to_string(),
                email: "dana@ironworks.example".to_string(),
                password_hash: hash_password(OWNER_PASSWORD)?,
                photo_url: None,
            })
            .await?;

        let jwt_token = issue_token_pair(owner.id, &config.jwt.secret)?.access_token;

        let state = AppState::new(store.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext {
            store,
            app,
            config,
            owner,
            jwt_token,
        })
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.jwt_token)
    }

    /// Authenticated request as the context's owner
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_token(Some(&self.jwt_token), method, uri, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    /// Request with an explicit token, or none
    pub async fn send_with_token(
        &self,
        token: Option<&str>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }
}

/// A valid enrollment form
pub fn member_form(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "555-0100",
        "address": "1 Main St",
        "duration": 1,
        "emergency_contact": { "name": "Sam", "phone": "555-0199" }
    })
}

pub fn trainer_form(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "phone": "555-0142",
        "specialization": "Strength"
    })
}

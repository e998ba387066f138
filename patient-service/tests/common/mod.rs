use std::sync::Arc;

use auth::TokenIssuer;
use patient_service::domain::user::service::AuthService;
use patient_service::inbound::http::router::create_router;
use patient_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server backed by the in-memory
/// store, so the suite runs without external services.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let token_issuer = Arc::new(TokenIssuer::new(JWT_SECRET, 24));
        let auth_service = Arc::new(AuthService::new(repository, Arc::clone(&token_issuer)));

        let router = create_router(auth_service, token_issuer);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.put(path).bearer_auth(token)
    }

    /// Register a user and return the issued token.
    pub async fn register_user(&self, email: &str, password: &str) -> String {
        let response = self
            .post("/api/auth/register")
            .json(&registration_body(email, password))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Registration response missing token")
            .to_string()
    }
}

/// A registration payload that passes every validation rule.
pub fn registration_body(email: &str, password: &str) -> Value {
    json!({
        "firstName": "Jane",
        "lastName": "Doe",
        "email": email,
        "password": password,
        "dateOfBirth": "1990-05-15",
        "phoneNumber": "+15551234567"
    })
}

/// A signed token whose expiry is already in the past.
pub fn expired_token(subject: &str) -> String {
    TokenIssuer::new(JWT_SECRET, -2)
        .mint(subject)
        .expect("Failed to mint expired token")
}

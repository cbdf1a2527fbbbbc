use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use user_service::domain::user::models::Username;
use user_service::domain::user::service::UserService;
use user_service::domain::user::service::UserServiceSettings;
use user_service::inbound::http::router::create_router;
use user_service::outbound::repositories::InMemoryUserRepository;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    /// Shares the server's signing key, for forging tokens in tests
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application with identities taken from the token snapshot.
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    /// Spawn the application, re-reading the store on every protected request.
    pub async fn spawn_refreshing() -> Self {
        Self::spawn_with(true).await
    }

    async fn spawn_with(refresh_identity: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());

        // Cheapest work factor argon2 accepts, keeps the suite fast
        let password_hasher =
            PasswordHasher::with_work_factor(1024, 1, 1).expect("Invalid test work factor");
        let authenticator = Arc::new(Authenticator::new(
            password_hasher,
            JwtHandler::new(JWT_SECRET),
            chrono::Duration::hours(1),
        ));

        let user_service = Arc::new(UserService::new(
            Arc::clone(&repository),
            authenticator,
            UserServiceSettings {
                store_timeout: Duration::from_secs(2),
                refresh_identity,
            },
        ));

        let router = create_router(user_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            jwt_handler: JwtHandler::new(JWT_SECRET),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body.
    pub async fn register(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/v1/user/register")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the issued access token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/v1/user/login")
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("Missing access token")
            .to_string()
    }

    /// Flip a stored user to inactive behind the service's back.
    pub async fn deactivate(&self, username: &str) {
        let username = Username::new(username.to_string()).expect("Invalid username");
        self.repository
            .deactivate(&username)
            .await
            .expect("Failed to deactivate user");
    }
}

use std::sync::Arc;

use auth::Authenticator;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenIssuer;
use chrono::Duration;
use identity_service::domain::identity::models::SecretPolicy;
use identity_service::domain::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryIdentityRepository;

pub const SIGNING_KEY: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Cheap Argon2id cost so tests stay fast in debug builds.
pub const TEST_HASH_COST: HashCost = HashCost {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// Build the identity service over an in-memory store.
pub fn identity_service(
    repository: Arc<InMemoryIdentityRepository>,
) -> IdentityService<InMemoryIdentityRepository> {
    let policy = SecretPolicy::default();
    let password_hasher =
        PasswordHasher::new(TEST_HASH_COST, policy.max_length).expect("Failed to build hasher");
    let token_issuer = TokenIssuer::new(SIGNING_KEY, "identity-service", Duration::hours(24));
    let authenticator = Arc::new(
        Authenticator::new(password_hasher, token_issuer).expect("Failed to build authenticator"),
    );

    IdentityService::new(repository, authenticator, policy, 4)
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryIdentityRepository>,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
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

        let repository = Arc::new(InMemoryIdentityRepository::new());
        let identity_service = Arc::new(identity_service(Arc::clone(&repository)));

        let router = create_router(identity_service);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(SIGNING_KEY, "identity-service", Duration::hours(24)),
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

    /// Register an identity and return the raw response
    pub async fn register(&self, identifier: &str, secret: &str) -> reqwest::Response {
        self.post("/v1/register")
            .json(&serde_json::json!({
                "identifier": identifier,
                "secret": secret
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the raw response
    pub async fn login(&self, identifier: &str, secret: &str) -> reqwest::Response {
        self.post("/v1/login")
            .json(&serde_json::json!({
                "identifier": identifier,
                "secret": secret
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

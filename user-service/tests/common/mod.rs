use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;
use user_service::domain::user::models::NewUser;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::http::router::create_router;
use user_service::user::errors::UserError;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
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

        let authenticator = Arc::new(
            Authenticator::new(JWT_SECRET, Duration::hours(24))
                .expect("Failed to create authenticator"),
        );
        let user_repo = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(user_repo, Arc::clone(&authenticator)));

        let router = create_router(user_service, Arc::clone(&authenticator));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
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

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/users/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log in and return the issued token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/api/users/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

/// User store kept in memory; enforces the same unique constraints as the
/// `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    next_id: i64,
    users: Vec<User>,
}

impl InMemoryState {
    fn check_unique(
        &self,
        user_id: Option<UserId>,
        username: &str,
        email: &str,
    ) -> Result<(), UserError> {
        for other in self.users.iter().filter(|u| Some(u.id) != user_id) {
            if other.username.as_str() == username {
                return Err(UserError::UsernameAlreadyExists(username.to_string()));
            }
            if other.email.as_str() == email {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();
        state.check_unique(None, user.username.as_str(), user.email.as_str())?;

        state.next_id += 1;
        let created = User {
            id: UserId(state.next_id),
            username: user.username,
            email: user.email,
            phone: user.phone,
            password_hash: user.password_hash,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.created_at,
            last_login_at: None,
        };
        state.users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| &u.username == username).cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.lock().unwrap();
        state.check_unique(Some(user.id), user.username.as_str(), user.email.as_str())?;

        let stored = state
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| UserError::NotFound(user.id.to_string()))?;
        *stored = user.clone();

        Ok(user)
    }

    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), UserError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;
        stored.last_login_at = Some(at);

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.lock().unwrap();
        let before = state.users.len();
        state.users.retain(|u| u.id != *id);

        if state.users.len() == before {
            return Err(UserError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

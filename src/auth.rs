// src/auth.rs
use tracing::{info, warn};

use crate::core::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::types::User;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// Stored token not checked yet.
    Loading,
    Authenticated { user: User },
    Unauthenticated,
}

/// Explicit login session. Holds the auth state and drives the
/// login / verify / logout calls against the API.
pub struct AuthSession {
    client: ApiClient,
    state: AuthState,
}

impl AuthSession {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: AuthState::Loading,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    /// Verify the stored token once. Any failure drops the token.
    pub async fn restore(&mut self) -> &AuthState {
        let token = match self.client.tokens().load() {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        };

        if token.is_none() {
            self.state = AuthState::Unauthenticated;
            return &self.state;
        }

        match self.client.profile().await {
            Ok(user) => {
                info!("Restored session for {}", user.email);
                self.state = AuthState::Authenticated { user };
            }
            Err(e) => {
                warn!("Token verification failed: {}", e);
                if let Err(e) = self.client.tokens().clear() {
                    warn!("Failed to clear stored token: {}", e);
                }
                self.state = AuthState::Unauthenticated;
            }
        }

        &self.state
    }

    /// Exchange credentials for a token. On rejection the state is left
    /// as it was and the error carries the server message.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<User> {
        let response = match self.client.login(email, password).await {
            Ok(response) => response,
            Err(ApiError::Http { status, message }) => {
                let message = if message.starts_with("HTTP error!") {
                    "Login failed".to_string()
                } else {
                    message
                };
                return Err(ApiError::Http { status, message });
            }
            Err(e) => return Err(e),
        };

        self.client.tokens().save(&response.access_token)?;
        info!("Logged in as {}", response.user.email);
        let user = response.user;
        self.state = AuthState::Authenticated { user: user.clone() };
        Ok(user)
    }

    pub fn logout(&mut self) -> ApiResult<()> {
        self.client.tokens().clear()?;
        self.state = AuthState::Unauthenticated;
        info!("Logged out");
        Ok(())
    }

    /// Dashboard greeting line.
    pub fn greeting(&self) -> Option<String> {
        self.user()
            .map(|user| format!("Welcome, {}", user.display_name()))
    }
}

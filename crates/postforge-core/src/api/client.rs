//! API client for the postforge authentication service.
//!
//! This module provides the `AuthClient` struct for the credential,
//! session, OAuth, and profile endpoints the client depends on.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::auth::oauth::OAuthProvider;
use crate::models::{
    ApiUser, AuthResponse, MessageResponse, ProfileUpdate, RedirectResponse, ServiceHealth,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Default base URL for the authentication service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/auth";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the authentication service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a new client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if response is successful, returning an error with the body
    /// message if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Authenticate with an email/password pair.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let url = format!("{}/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send login request")?;

        let response = Self::check_response(response).await?;

        response.json().await.context("Failed to parse login response")
    }

    /// Register a new account. The registration endpoint does not issue a
    /// session; callers follow up with [`AuthClient::login`].
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<ApiUser> {
        let url = format!("{}/signup", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password, "name": name });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to send signup request")?;

        let response = Self::check_response(response).await?;

        response.json().await.context("Failed to parse signup response")
    }

    /// Fetch the profile of the bearer token's user.
    pub async fn current_user(&self, token: &str) -> Result<ApiUser> {
        let url = format!("{}/users/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send current-user request")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse current-user response")
    }

    /// Notify the service of a logout. Callers treat failure as non-fatal.
    pub async fn logout(&self, token: &str) -> Result<()> {
        let url = format!("{}/logout", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to send logout request")?;

        let response = Self::check_response(response).await?;

        let ack: MessageResponse = response
            .json()
            .await
            .context("Failed to parse logout response")?;
        debug!(message = %ack.message, "Logout acknowledged");
        Ok(())
    }

    /// Update profile fields of the bearer token's user.
    pub async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<ApiUser> {
        let url = format!("{}/users/me", self.base_url);

        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(update)
            .send()
            .await
            .context("Failed to send profile update")?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse profile update response")
    }

    /// Start the OAuth handshake for a provider, returning the authorization
    /// URL to open in a browser.
    pub async fn oauth_authorize_url(&self, provider: OAuthProvider) -> Result<String> {
        let url = format!("{}/{}/login", self.base_url, provider);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {provider} authorization endpoint"))?;

        let response = Self::check_response(response).await?;

        let redirect: RedirectResponse = response
            .json()
            .await
            .context("Failed to parse authorization response")?;
        Ok(redirect.redirect_url)
    }

    /// Exchange the authorization code received on the redirect back from a
    /// provider. One request, one response; the flow is not resumable.
    pub async fn oauth_exchange(
        &self,
        provider: OAuthProvider,
        code: &str,
        state: &str,
    ) -> Result<AuthResponse> {
        let url = format!("{}/{}/callback", self.base_url, provider);

        let response = self
            .client
            .get(&url)
            .query(&[("code", code), ("state", state)])
            .send()
            .await
            .with_context(|| format!("Failed to reach {provider} callback endpoint"))?;

        let response = Self::check_response(response).await?;

        response
            .json()
            .await
            .context("Failed to parse callback response")
    }

    /// Probe the service health endpoint.
    pub async fn health(&self) -> Result<ServiceHealth> {
        let url = format!("{}/health", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send health request")?;

        let response = Self::check_response(response).await?;

        response.json().await.context("Failed to parse health response")
    }
}

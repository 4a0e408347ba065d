//! The session manager: single source of truth for "who is using this
//! client right now".
//!
//! All session-mutating operations hold one async mutex over the session
//! record for their full duration, so concurrent calls cannot interleave
//! partial writes to the token/user pair.

use anyhow::{anyhow, Context, Result};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::AuthClient;
use crate::models::{ProfileUpdate, User};

use super::oauth::OAuthProvider;
use super::session::{SessionStore, StoredSession};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Constructed, `initialize` not yet called
    Uninitialized,
    /// An operation is in flight
    Loading,
    /// Token and user are both present
    Authenticated,
    /// No session; the normal signed-out state
    Anonymous,
    /// A user-initiated operation failed and no session is established
    Error,
}

/// Point-in-time view of the session for the UI layer.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub user: Option<User>,
    pub error: Option<String>,
}

struct SessionState {
    status: SessionStatus,
    token: Option<String>,
    user: Option<User>,
    error: Option<String>,
}

pub struct SessionManager {
    api: AuthClient,
    store: SessionStore,
    state: Mutex<SessionState>,
}

impl SessionManager {
    pub fn new(api: AuthClient, store: SessionStore) -> Self {
        Self {
            api,
            store,
            state: Mutex::new(SessionState {
                status: SessionStatus::Uninitialized,
                token: None,
                user: None,
                error: None,
            }),
        }
    }

    /// Hydrate the session from the persisted token. Failures are absorbed:
    /// the session always lands in `Authenticated` or `Anonymous`, and no
    /// error message is surfaced.
    pub async fn initialize(&self) {
        let mut state = self.state.lock().await;
        state.status = SessionStatus::Loading;

        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                debug!(error = %e, "Discarding unreadable session file");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear session file");
                }
                None
            }
        };

        let Some(stored) = stored else {
            state.token = None;
            state.user = None;
            state.status = SessionStatus::Anonymous;
            return;
        };

        state.token = Some(stored.token.clone());

        match self.api.current_user(&stored.token).await {
            Ok(raw) => {
                let user = raw.into_user();
                // Refresh the stored record so the next load sees current data.
                if let Err(e) = self.store.save(&StoredSession {
                    user: Some(user.clone()),
                    ..stored
                }) {
                    warn!(error = %e, "Failed to refresh stored session");
                }
                info!(user = %user.email, "Session hydrated");
                state.user = Some(user);
                state.status = SessionStatus::Authenticated;
            }
            Err(e) => {
                debug!(error = %e, "Stored token rejected, discarding session");
                if let Err(e) = self.store.clear() {
                    warn!(error = %e, "Failed to clear session file");
                }
                state.token = None;
                state.user = None;
                state.status = SessionStatus::Anonymous;
            }
        }
    }

    /// Authenticate with an email/password pair. On failure the prior
    /// session is left in place; the error is stored on the session and
    /// re-signaled to the caller for display.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        let mut state = self.state.lock().await;
        let previous_status = state.status;
        self.login_locked(&mut state, previous_status, email, password)
            .await
    }

    /// Register an account and immediately establish a session with the new
    /// credentials. The registration endpoint does not return a usable
    /// session, so a follow-up login is always performed.
    pub async fn signup(&self, email: &str, password: &str, name: &str) -> Result<User> {
        let mut state = self.state.lock().await;
        let previous_status = state.status;
        state.error = None;
        state.status = SessionStatus::Loading;

        let created = match self.api.signup(email, password, name).await {
            Ok(created) => created,
            Err(e) => {
                state.error = Some(e.to_string());
                state.status = Self::failed_status(previous_status);
                return Err(e);
            }
        };
        debug!(user_id = %created.id, "Account registered");

        self.login_locked(&mut state, previous_status, email, password)
            .await
    }

    /// End the session. The remote notification is best-effort; local state
    /// is always cleared.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;

        if let Some(token) = state.token.take() {
            if let Err(e) = self.api.logout(&token).await {
                warn!(error = %e, "Remote logout failed, clearing local session anyway");
            }
        }

        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear session file");
        }
        state.user = None;
        state.status = SessionStatus::Anonymous;
        info!("Logged out");
    }

    /// Clear the stored error message. Status and token are unaffected.
    pub async fn clear_error(&self) {
        self.state.lock().await.error = None;
    }

    /// Begin the OAuth handshake; returns the provider authorization URL.
    pub async fn connect_start(&self, provider: OAuthProvider) -> Result<String> {
        self.api.oauth_authorize_url(provider).await
    }

    /// Complete the OAuth handshake with the code/state pair from the
    /// provider redirect. Success establishes a session exactly like login.
    pub async fn connect_finish(
        &self,
        provider: OAuthProvider,
        code: &str,
        state_param: &str,
    ) -> Result<User> {
        let mut state = self.state.lock().await;
        let previous_status = state.status;
        state.error = None;
        state.status = SessionStatus::Loading;

        match self.try_connect(provider, code, state_param).await {
            Ok((token, user)) => {
                state.token = Some(token);
                state.user = Some(user.clone());
                state.status = SessionStatus::Authenticated;
                Ok(user)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                state.status = Self::failed_status(previous_status);
                Err(e)
            }
        }
    }

    /// Update profile fields for the authenticated user, refreshing both
    /// the in-memory and stored records.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let mut state = self.state.lock().await;
        let token = state
            .token
            .clone()
            .ok_or_else(|| anyhow!("Not logged in"))?;

        let user = self.api.update_profile(&token, update).await?.into_user();

        let refreshed = match self.store.load() {
            Ok(Some(stored)) => StoredSession {
                user: Some(user.clone()),
                ..stored
            },
            _ => StoredSession::new(token, Some(user.clone())),
        };
        self.store
            .save(&refreshed)
            .context("Failed to persist session")?;

        state.user = Some(user.clone());
        Ok(user)
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// The bearer token, if a session is established.
    pub async fn token(&self) -> Option<String> {
        self.state.lock().await.token.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            status: state.status,
            user: state.user.clone(),
            error: state.error.clone(),
        }
    }

    /// Status after a failed user-initiated operation: an established
    /// session survives untouched, otherwise the session is in error.
    fn failed_status(previous_status: SessionStatus) -> SessionStatus {
        if previous_status == SessionStatus::Authenticated {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Error
        }
    }

    async fn login_locked(
        &self,
        state: &mut SessionState,
        previous_status: SessionStatus,
        email: &str,
        password: &str,
    ) -> Result<User> {
        state.error = None;
        state.status = SessionStatus::Loading;

        match self.try_login(state, email, password).await {
            Ok(user) => {
                state.status = SessionStatus::Authenticated;
                Ok(user)
            }
            Err(e) => {
                state.error = Some(e.to_string());
                state.status = Self::failed_status(previous_status);
                Err(e)
            }
        }
    }

    async fn try_login(
        &self,
        state: &mut SessionState,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let auth = self.api.login(email, password).await?;

        // Keep the prior stored session around so a failed user fetch can
        // put the store back the way it was.
        let previous = self.store.load().unwrap_or_default();

        // The token must be durable before the dependent user fetch.
        self.store
            .save(&StoredSession::new(auth.token.clone(), None))
            .context("Failed to persist session token")?;

        match self.api.current_user(&auth.token).await {
            Ok(raw) => {
                let user = raw.into_user();
                if let Err(e) = self
                    .store
                    .save(&StoredSession::new(auth.token.clone(), Some(user.clone())))
                {
                    self.restore_store(previous);
                    return Err(e).context("Failed to persist session");
                }
                info!(user = %user.email, "Logged in");
                state.token = Some(auth.token);
                state.user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                // A half-written token must not survive a failed login.
                self.restore_store(previous);
                Err(e)
            }
        }
    }

    async fn try_connect(
        &self,
        provider: OAuthProvider,
        code: &str,
        state_param: &str,
    ) -> Result<(String, User)> {
        let auth = self.api.oauth_exchange(provider, code, state_param).await?;
        let user = auth.user.into_user();

        self.store
            .save(&StoredSession::new(auth.token.clone(), Some(user.clone())))
            .context("Failed to persist session")?;

        info!(user = %user.email, provider = %provider, "Connected via OAuth");
        Ok((auth.token, user))
    }

    fn restore_store(&self, previous: Option<StoredSession>) {
        let restore = match previous {
            Some(prior) => self.store.save(&prior),
            None => self.store.clear(),
        };
        if let Err(e) = restore {
            warn!(error = %e, "Failed to restore prior session");
        }
    }
}

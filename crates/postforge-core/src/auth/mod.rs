//! Session lifecycle and credential management.
//!
//! This module provides:
//! - `SessionManager`: the single source of truth for the current user
//! - `SessionStore`: durable token + user persistence in the cache directory
//! - `CredentialStore`: optional OS-keychain "remember me" storage
//! - `oauth`: the provider redirect/callback handshake

pub mod credentials;
pub mod manager;
pub mod oauth;
pub mod session;

pub use credentials::CredentialStore;
pub use manager::{SessionManager, SessionSnapshot, SessionStatus};
pub use oauth::OAuthProvider;
pub use session::{SessionStore, StoredSession};

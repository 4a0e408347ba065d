//! Third-party OAuth handshake support.
//!
//! The flow is a single redirect-and-exchange: ask the backend for a
//! provider authorization URL, send the user there, then trade the
//! `code`/`state` pair from the redirect back for a session.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use url::Url;

/// Identity providers the backend can broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Facebook,
}

impl OAuthProvider {
    /// Path segment used in the service's OAuth endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Facebook => "facebook",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(OAuthProvider::Google),
            "facebook" => Ok(OAuthProvider::Facebook),
            other => Err(anyhow!("Unknown OAuth provider: {other}")),
        }
    }
}

/// Extract the `code` and `state` parameters from the URL the provider
/// redirected back to.
pub fn parse_callback_url(callback_url: &str) -> Result<(String, String)> {
    let url = Url::parse(callback_url).context("Redirect URL is not a valid URL")?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, state) {
        (Some(code), Some(state)) => Ok((code, state)),
        (None, _) => Err(anyhow!("Redirect URL is missing the code parameter")),
        (_, None) => Err(anyhow!("Redirect URL is missing the state parameter")),
    }
}

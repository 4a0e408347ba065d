//! Core library for the postforge client.
//!
//! Everything the UI surfaces need to talk to the postforge platform:
//!
//! - [`auth::SessionManager`]: the single source of truth for the current user
//! - [`api::AuthClient`]: typed client for the remote authentication service
//! - [`auth::SessionStore`] / [`auth::CredentialStore`]: durable local storage
//! - [`models`]: wire and domain types
//! - [`config::Config`]: configuration file handling

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod utils;

//! Data models for the authentication service.
//!
//! Raw wire types (`ApiUser`, `AuthResponse`, ...) mirror the service's
//! camelCase JSON; the normalized [`User`] is what the rest of the client
//! consumes.

pub mod user;

pub use user::{
    ApiUser, AuthResponse, MessageResponse, ProfileUpdate, RedirectResponse, ServiceHealth, User,
};

//! Client for the remote authentication HTTP service.

pub mod client;
pub mod error;

pub use client::{AuthClient, DEFAULT_BASE_URL};
pub use error::ApiError;

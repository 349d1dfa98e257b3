//! HTTP gateway for the shop backend
//!
//! [`ShopClient`] attaches the session token to every request and clears the
//! session when the backend answers `401 Unauthorized`. Route bindings live in
//! one file per resource group under [`client`].

pub mod auth;
pub mod client;
pub mod types;

pub use auth::AuthService;
pub use client::error::ClientError;
pub use client::{DEFAULT_TIMEOUT, ShopClient, ShopClientBuilder};

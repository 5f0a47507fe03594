//! # API Module
//!
//! HTTP endpoints served by the local callback server during `musicrawl auth`.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization
//!   server, checks the `state` parameter and exchanges the authorization
//!   code for a token pair. The token is handed to the waiting `auth`
//!   command through the shared [`crate::types::AuthState`].
//! - [`health`] - Reports status and version, handy to check that the
//!   listener is up before opening the browser.
//!
//! The listener is single-use: it lives only as long as the `auth` command.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use musicrawl::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;

//! # Spotify Integration Module
//!
//! This module is the integration layer between musicrawl and the Spotify
//! Web API. It covers the authorization-code flow used to obtain an access
//! token and the two read-only endpoints the crawler needs.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Pipeline)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 authorization code)
//!     ├── Saved Tracks (GET /me/tracks)
//!     └── Profile (GET /me)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - Authorization URL construction, code exchange and the
//!   interactive flow driving the local callback server
//! - [`tracks`] - The user's saved ("liked") tracks, normalized to
//!   [`crate::types::Track`]
//! - [`profile`] - The current user's profile as raw JSON
//!
//! ## Error Handling
//!
//! Every call goes through one [`reqwest::Client`] built with a request
//! timeout. Failures are mapped onto [`crate::Error`]:
//! - connection failures and timeouts become `Transport`
//! - non-2xx responses become `Http { status }`, an expired token shows up
//!   as `401`
//! - bodies that do not match the expected shape become `Decode`
//!
//! Nothing is retried. The crawler is a one-shot job and re-running it is
//! the recovery path.
//!
//! ## Pagination
//!
//! The saved tracks endpoint is paged by Spotify. Only the first page is
//! requested and the `next` link is ignored, so a run sees a prefix of the
//! user's library (the API default page size).

pub mod auth;
pub mod profile;
pub mod tracks;

use std::time::Duration;

use reqwest::{Client, Response};

use crate::{Error, Res, config::Config, types::AccessToken};

/// Authenticated access to the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
}

impl SpotifyClient {
    /// Creates a client for `api_url` (without trailing slash) whose requests
    /// give up after `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Res<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Res<Self> {
        Self::new(config.api_url.clone(), config.http_timeout)
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Sends an authenticated GET to `path` and returns the successful
    /// response body as bytes.
    pub(crate) async fn get_bytes(&self, path: &str, token: &AccessToken) -> Res<Vec<u8>> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(Error::Transport)?;

        let response = check_status(response)?;
        let body = response.bytes().await.map_err(Error::Transport)?;
        Ok(body.to_vec())
    }
}

fn check_status(response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Http { status })
    }
}

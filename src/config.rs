//! Configuration management for the liked tracks crawler.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files. Values are collected once into a [`Config`]
//! and passed explicitly to every component; nothing reads the environment
//! after startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{Error, Res};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SCOPE: &str = "user-read-private user-library-read";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_REDIS_URL: &str = "redis://redis:6379/0";
pub const DEFAULT_TOKEN_FILE: &str = "tokens.txt";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SCAN_COUNT: usize = 10;

/// Loads environment variables from `.env` files.
///
/// Creates the local data directory if it doesn't exist, then loads the
/// `.env` file from the working directory and the one located in the
/// platform-specific data directory under `musicrawl/.env`. Variables that
/// are already set are never overwritten, so the process environment wins.
/// Missing files are not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/musicrawl/.env`
/// - macOS: `~/Library/Application Support/musicrawl/.env`
/// - Windows: `%LOCALAPPDATA%/musicrawl/.env`
///
/// # Errors
///
/// Returns [`Error::Config`] if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Config(e.to_string()))?;
    }

    if let Err(e) = dotenv::dotenv() {
        if !e.not_found() {
            return Err(Error::Config(e.to_string()));
        }
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| Error::Config(e.to_string()))?;
    }
    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musicrawl/.env");
    path
}

/// Runtime settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Spotify Web API, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// Spotify authorization endpoint users are sent to.
    pub auth_url: String,
    /// Spotify token exchange endpoint.
    pub token_url: String,
    /// Callback URL registered for the Spotify application.
    pub redirect_uri: String,
    /// Space separated list of requested scopes.
    pub scope: String,
    /// Bind address of the local callback listener.
    pub server_addr: String,
    /// Connection URL of the Redis instance holding the track records.
    pub redis_url: String,
    /// File holding the `Access Token:` / `Refresh Token:` lines.
    pub token_file: PathBuf,
    /// Timeout applied to every outbound API request.
    pub http_timeout: Duration,
    /// How long `auth` waits for the OAuth callback.
    pub auth_timeout: Duration,
    /// `COUNT` hint sent with every `SCAN`.
    pub scan_count: usize,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables fall back to their defaults. Numeric
    /// variables that do not parse are reported as [`Error::Config`].
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            api_url: get("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            auth_url: get("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: get("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            redirect_uri: get("SPOTIFY_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: get("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            server_addr: get("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            redis_url: get("REDIS_URL", DEFAULT_REDIS_URL),
            token_file: PathBuf::from(get("TOKEN_FILE", DEFAULT_TOKEN_FILE)),
            http_timeout: Duration::from_secs(parse_number(
                &lookup,
                "HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            auth_timeout: Duration::from_secs(parse_number(
                &lookup,
                "AUTH_TIMEOUT_SECS",
                DEFAULT_AUTH_TIMEOUT_SECS,
            )?),
            scan_count: parse_number(&lookup, "SCAN_COUNT", DEFAULT_SCAN_COUNT)?,
        })
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Res<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{key} must be a positive number, got {raw:?}"))),
        None => Ok(default),
    }
}

/// OAuth client credentials of the registered Spotify application.
///
/// Only the `auth` command needs them, so they are loaded separately from
/// [`Config`].
#[derive(Clone)]
pub struct OAuthCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl OAuthCredentials {
    /// Reads `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first variable that is missing.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Config(format!("{key} must be set")))
        };

        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
        })
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

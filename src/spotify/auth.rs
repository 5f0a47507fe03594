use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Local};
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    Error, Res,
    config::{Config, OAuthCredentials},
    management::{CredentialStore, save_tokens},
    server, success,
    types::{AuthState, TokenPair},
    utils, warning,
};

/// Runs the OAuth 2.0 authorization-code flow with Spotify.
///
/// This function orchestrates the entire authentication process:
/// 1. Generates a random `state` value protecting the callback
/// 2. Binds the local callback server and serves it in the background
/// 3. Opens the authorization URL in the user's browser
/// 4. Waits (bounded by `config.auth_timeout`) for the callback handler to
///    exchange the authorization code
/// 5. Persists the token pair through `store`
///
/// # Error Handling
///
/// - Browser launch failures result in a warning with manual URL instructions
/// - A callback address that cannot be bound is returned as `Io`
/// - No token before the timeout is returned as `Auth`
/// - Token persistence failures are returned as-is
pub async fn auth<S: CredentialStore>(
    config: &Config,
    credentials: &OAuthCredentials,
    store: &S,
) -> Res<TokenPair> {
    let csrf_state = utils::generate_state();
    let auth_url = authorize_url(config, &credentials.client_id, &csrf_state)?;

    let shared_state = Arc::new(Mutex::new(AuthState {
        csrf_state,
        client_id: credentials.client_id.clone(),
        client_secret: credentials.client_secret.clone(),
        redirect_uri: config.redirect_uri.clone(),
        token_url: config.token_url.clone(),
        http_timeout: config.http_timeout,
        token: None,
    }));

    let listener = server::bind(&config.server_addr).await?;
    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state, config.auth_timeout)
        .await
        .ok_or_else(|| Error::Auth("no authorization received before the timeout".into()))?;

    save_tokens(store, &token).await?;

    match token.expires_in.and_then(token_expiry) {
        Some(expires_at) => {
            success!(
                "Tokens saved to {}. Access token valid until {}",
                store.describe(),
                expires_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
        None => success!("Tokens saved to {}", store.describe()),
    }

    Ok(token)
}

/// Builds the Spotify authorization URL the user has to visit.
pub fn authorize_url(config: &Config, client_id: &str, state: &str) -> Res<String> {
    let url = Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid authorization URL: {e}")))?;
    Ok(url.to_string())
}

/// Local time at which a token valid for `expires_in` seconds runs out.
///
/// Returns `None` when the value does not fit a date.
pub fn token_expiry(expires_in: u64) -> Option<DateTime<Local>> {
    let valid_for = i64::try_from(expires_in)
        .ok()
        .and_then(chrono::Duration::try_seconds)?;
    Local::now().checked_add_signed(valid_for)
}

/// Polls the shared state until the callback stored a token or `max_wait`
/// has passed, including time spent waiting for the lock.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<AuthState>>,
    max_wait: Duration,
) -> Option<TokenPair> {
    let poll = async {
        loop {
            if let Some(token) = shared_state.lock().await.token.clone() {
                return token;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    };

    tokio::time::timeout(max_wait, poll).await.ok()
}

/// Exchanges an authorization code for a token pair.
///
/// Posts `grant_type=authorization_code` together with the code and the
/// redirect URI to the token endpoint, authenticating the application with
/// HTTP Basic client credentials. The request gives up after
/// `state.http_timeout`.
///
/// # Errors
///
/// - `Transport` - token endpoint unreachable or too slow
/// - `Http { status }` - code rejected (expired, reused, wrong redirect URI)
/// - `Decode` - response without an `access_token`
pub async fn exchange_code(state: &AuthState, code: &str) -> Res<TokenPair> {
    let client = Client::builder()
        .timeout(state.http_timeout)
        .build()
        .map_err(Error::Transport)?;
    let response = client
        .post(&state.token_url)
        .basic_auth(&state.client_id, Some(&state.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", state.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

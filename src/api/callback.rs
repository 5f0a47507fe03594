use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{spotify::auth::exchange_code, types::AuthState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<AuthState>>>,
) -> Html<&'static str> {
    let request = {
        let state = shared_state.lock().await;

        if params.get("state") != Some(&state.csrf_state) {
            warning!("Callback rejected: state parameter does not match.");
            return Html("<h4>Invalid state parameter.</h4>");
        }

        if let Some(error) = params.get("error") {
            warning!("Authorization denied: {}", error);
            return Html("<h4>Authorization was denied.</h4>");
        }

        if state.token.is_some() {
            return Html("<h4>Already authorized.</h4><p>Close browser window.</p>");
        }

        state.clone()
    };

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    // the lock is not held across the exchange
    match exchange_code(&request, code).await {
        Ok(token) => {
            let mut state = shared_state.lock().await;
            if state.token.is_none() {
                state.token = Some(token);
            }
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}

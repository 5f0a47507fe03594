use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::AuthState;

pub async fn health(Extension(shared_state): Extension<Arc<Mutex<AuthState>>>) -> Json<Value> {
    let authorized = shared_state.lock().await.token.is_some();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": authorized
    }))
}

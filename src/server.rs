use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Error, Res, api, types::AuthState};

pub fn router(state: Arc<Mutex<AuthState>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

pub async fn bind(server_addr: &str) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(server_addr)
        .map_err(|e| Error::Config(format!("invalid server address {server_addr}: {e}")))?;
    Ok(TcpListener::bind(&addr).await?)
}

pub async fn serve(listener: TcpListener, state: Arc<Mutex<AuthState>>) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

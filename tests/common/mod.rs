#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Router,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::get,
};
use musicrawl::spotify::SpotifyClient;
use serde_json::Value;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Stand-in for `GET /me/tracks` and `GET /me` that only answers requests
/// carrying `Bearer <token>`; everything else gets a 401.
pub fn fake_spotify(token: &str, tracks_body: Value, profile_body: &str) -> (Router, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let expected = format!("Bearer {token}");

    let tracks_hits = Arc::clone(&hits);
    let tracks_expected = expected.clone();
    let profile_body = profile_body.to_string();

    let app = Router::new()
        .route(
            "/me/tracks",
            get(move |headers: HeaderMap| {
                let body = tracks_body.to_string();
                let hits = Arc::clone(&tracks_hits);
                let expected = tracks_expected.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    respond(&headers, &expected, body)
                }
            }),
        )
        .route(
            "/me",
            get(move |headers: HeaderMap| {
                let body = profile_body.clone();
                let expected = expected.clone();
                async move { respond(&headers, &expected, body) }
            }),
        );

    (app, hits)
}

/// Stand-in answering every `GET /me/tracks` with a fixed status and body.
pub fn fixed_response(status: StatusCode, body: &'static str) -> Router {
    Router::new().route("/me/tracks", get(move || async move { (status, body) }))
}

fn respond(headers: &HeaderMap, expected: &str, body: String) -> (StatusCode, String) {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if auth == Some(expected) {
        (StatusCode::OK, body)
    } else {
        (StatusCode::UNAUTHORIZED, r#"{"error":{"status":401}}"#.to_string())
    }
}

pub fn client(base_url: &str) -> SpotifyClient {
    SpotifyClient::new(base_url, Duration::from_secs(5)).unwrap()
}

/// One saved track item as returned inside the `items` array.
pub fn item(id: &str, name: &str, artists: &[&str]) -> Value {
    let artists: Vec<Value> = artists
        .iter()
        .map(|a| serde_json::json!({ "id": a, "name": format!("Artist {a}") }))
        .collect();
    serde_json::json!({
        "added_at": "2024-01-01T00:00:00Z",
        "track": { "id": id, "name": name, "artists": artists, "popularity": 50 }
    })
}

/// Wraps items into a saved tracks page.
pub fn envelope(items: Vec<Value>) -> Value {
    let total = items.len();
    serde_json::json!({
        "href": "https://api.spotify.com/v1/me/tracks?offset=0&limit=20",
        "limit": 20,
        "offset": 0,
        "total": total,
        "next": null,
        "items": items
    })
}

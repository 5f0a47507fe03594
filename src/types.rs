use std::time::Duration;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A liked track as stored in the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artist_id: String,
    pub genre: String,
}

impl From<SavedTrack> for Track {
    // only the first listed artist is kept, local files may carry a null id
    fn from(saved: SavedTrack) -> Track {
        Track {
            id: saved.id,
            name: saved.name,
            artist_id: saved
                .artists
                .into_iter()
                .next()
                .and_then(|a| a.id)
                .unwrap_or_default(),
            genre: String::new(),
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub key: String,
    pub id: String,
    pub name: String,
    pub artist_id: String,
    pub genre: String,
}

impl TrackTableRow {
    pub fn new(key: &str, track: &Track) -> Self {
        Self {
            key: key.to_string(),
            id: track.id.clone(),
            name: track.name.clone(),
            artist_id: track.artist_id.clone(),
            genre: track.genre.clone(),
        }
    }
}

/// Bearer credential presented to the Spotify Web API.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Tokens obtained from the authorization code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Shared between the `auth` command and the callback handler.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub csrf_state: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_url: String,
    /// Request timeout of the code exchange.
    pub http_timeout: Duration,
    pub token: Option<TokenPair>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTracksResponse {
    pub items: Vec<SavedTrackItem>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrackItem {
    pub track: SavedTrack,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
}

use crate::{
    Res,
    spotify::SpotifyClient,
    types::{AccessToken, SavedTracksResponse, Track},
};

impl SpotifyClient {
    /// Retrieves the user's saved tracks from the Spotify Web API.
    ///
    /// Calls `GET /me/tracks` with the token as bearer credential and turns
    /// every returned item into a [`Track`], in the order Spotify returned
    /// them. Only the first listed artist of a track is kept; a track without
    /// artists gets an empty `artist_id`. `genre` is always empty because the
    /// endpoint carries no genre data.
    ///
    /// # Single page
    ///
    /// No `limit` or `offset` is sent and the `next` link of the response is
    /// not followed. The result is the first page of the library only, at
    /// most the API default page size.
    ///
    /// # Errors
    ///
    /// - `Transport` - connection failure or timeout
    /// - `Http { status }` - non-success response, e.g. `401` for an expired token
    /// - `Decode` - body is not a saved tracks envelope
    ///
    /// # Example
    ///
    /// ```
    /// let token = get_token(&FileCredentialStore::new("tokens.txt")).await?;
    /// let tracks = client.fetch_favorites(&token).await?;
    /// println!("Fetched {} tracks", tracks.len());
    /// ```
    pub async fn fetch_favorites(&self, token: &AccessToken) -> Res<Vec<Track>> {
        let body = self.get_bytes("/me/tracks", token).await?;
        let envelope: SavedTracksResponse = serde_json::from_slice(&body)?;

        Ok(envelope
            .items
            .into_iter()
            .map(|item| Track::from(item.track))
            .collect())
    }
}

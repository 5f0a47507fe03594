use crate::{Res, spotify::SpotifyClient, types::AccessToken};

impl SpotifyClient {
    /// Returns the body of `GET /me` unparsed.
    pub async fn current_user_profile(&self, token: &AccessToken) -> Res<String> {
        let body = self.get_bytes("/me", token).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

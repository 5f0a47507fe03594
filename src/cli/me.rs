use crate::{
    config::Config,
    error,
    management::{FileCredentialStore, get_token},
    spotify::SpotifyClient,
    utils,
};

pub async fn me(config: &Config) {
    let store = FileCredentialStore::new(&config.token_file);
    let token = match get_token(&store).await {
        Ok(t) => t,
        Err(e) => error!(
            "Failed to load token. Please run musicrawl auth\n Error: {}",
            e
        ),
    };

    let client = match SpotifyClient::from_config(config) {
        Ok(c) => c,
        Err(e) => error!("Cannot create HTTP client: {}", e),
    };

    let pb = utils::spinner("Fetching user profile...");
    let profile = client.current_user_profile(&token).await;
    pb.finish_and_clear();

    match profile {
        Ok(body) => println!("Spotify User Profile: {}", body),
        Err(e) => error!("Error getting Spotify user profile: {}", e),
    }
}

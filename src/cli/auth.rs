use crate::{
    config::{Config, OAuthCredentials},
    error, info,
    management::FileCredentialStore,
    spotify,
};

pub async fn auth(config: &Config) {
    let credentials = match OAuthCredentials::from_env() {
        Ok(c) => c,
        Err(e) => error!("Cannot start authorization. Err: {}", e),
    };

    info!(
        "Waiting for the Spotify callback on {} ...",
        config.redirect_uri
    );
    let store = FileCredentialStore::new(&config.token_file);
    if let Err(e) = spotify::auth::auth(config, &credentials, &store).await {
        error!("Authentication failed: {}", e);
    }
}

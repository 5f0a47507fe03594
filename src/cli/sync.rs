use crate::{
    config::Config,
    error,
    management::{FileCredentialStore, RecordStore, RedisBackend},
    pipeline::Pipeline,
    spotify::SpotifyClient,
    success, warning,
};

pub async fn sync(config: &Config) {
    let backend = match RedisBackend::connect(&config.redis_url).await {
        Ok(b) => b,
        Err(e) => error!("Cannot connect to {}. Err: {}", config.redis_url, e),
    };
    let mut store = RecordStore::new(backend, config.scan_count);

    let credentials = FileCredentialStore::new(&config.token_file);
    let client = match SpotifyClient::from_config(config) {
        Ok(c) => c,
        Err(e) => error!("Cannot create HTTP client: {}", e),
    };

    let mut stdout = std::io::stdout();
    let outcome = Pipeline::new(&mut store, &credentials, &client)
        .run(&mut stdout)
        .await;
    store.close();

    match outcome {
        Ok(summary) if summary.failed.is_empty() => {
            success!("Sync finished: {} tracks saved.", summary.persisted)
        }
        Ok(summary) => warning!(
            "Sync finished with {} of {} tracks not saved. Re-run to retry them.",
            summary.failed.len(),
            summary.fetched
        ),
        Err(e) => error!("Sync failed: {}", e),
    }
}

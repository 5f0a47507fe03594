use crate::{
    config::Config,
    error,
    management::{RecordStore, RedisBackend},
    pipeline,
};

pub async fn list_tracks(config: &Config) {
    let backend = match RedisBackend::connect(&config.redis_url).await {
        Ok(b) => b,
        Err(e) => error!("Cannot connect to {}. Err: {}", config.redis_url, e),
    };
    let mut store = RecordStore::new(backend, config.scan_count);

    let mut stdout = std::io::stdout();
    if let Err(e) = pipeline::report(&mut store, &mut stdout).await {
        error!("Cannot list stored tracks: {}", e);
    }
    store.close();
}

mod credentials;
mod memory;
mod redis_backend;
mod store;

pub use credentials::ACCESS_TOKEN_LABEL;
pub use credentials::CredentialStore;
pub use credentials::FileCredentialStore;
pub use credentials::MemoryCredentialStore;
pub use credentials::REFRESH_TOKEN_LABEL;
pub use credentials::format_tokens;
pub use credentials::get_token;
pub use credentials::save_tokens;
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
pub use store::KvBackend;
pub use store::RecordStore;
pub use store::SCAN_PATTERN;

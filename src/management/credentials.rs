use std::path::PathBuf;
use std::sync::Mutex;

use crate::{
    Error, Res,
    types::{AccessToken, TokenPair},
};

pub const ACCESS_TOKEN_LABEL: &str = "Access Token:";
pub const REFRESH_TOKEN_LABEL: &str = "Refresh Token:";

/// Where the persisted token pair lives.
#[allow(async_fn_in_trait)]
pub trait CredentialStore {
    /// Human readable name of the source, used in error messages.
    fn describe(&self) -> String;

    async fn read(&self) -> Res<String>;

    async fn write(&self, contents: &str) -> Res<()>;
}

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn read(&self) -> Res<String> {
        Ok(async_fs::read_to_string(&self.path).await?)
    }

    async fn write(&self, contents: &str) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }
        Ok(async_fs::write(&self.path, contents).await?)
    }
}

/// In-memory credential source. `None` behaves like a missing file.
#[derive(Default)]
pub struct MemoryCredentialStore {
    contents: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn describe(&self) -> String {
        "in-memory credentials".to_string()
    }

    async fn read(&self) -> Res<String> {
        self.contents().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no credentials stored",
            ))
        })
    }

    async fn write(&self, contents: &str) -> Res<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?;
        *guard = Some(contents.to_string());
        Ok(())
    }
}

/// Reads the access token from the credential source.
///
/// The first line starting with `Access Token:` wins; the remainder of the
/// line is trimmed and returned. A label without a value counts as missing.
///
/// # Errors
///
/// - [`Error::Io`] when the source cannot be read
/// - [`Error::NotFound`] when no usable `Access Token:` line exists
pub async fn get_token<S: CredentialStore>(source: &S) -> Res<AccessToken> {
    let contents = source.read().await?;
    find_labeled_value(&contents, ACCESS_TOKEN_LABEL)
        .map(AccessToken::new)
        .ok_or_else(|| Error::NotFound {
            label: ACCESS_TOKEN_LABEL,
            location: source.describe(),
        })
}

/// Persists the token pair in the two-line text format `get_token` reads.
pub async fn save_tokens<S: CredentialStore>(store: &S, tokens: &TokenPair) -> Res<()> {
    store.write(&format_tokens(tokens)).await
}

pub fn format_tokens(tokens: &TokenPair) -> String {
    format!(
        "{ACCESS_TOKEN_LABEL} {}\n{REFRESH_TOKEN_LABEL} {}\n",
        tokens.access_token,
        tokens.refresh_token.as_deref().unwrap_or_default()
    )
}

fn find_labeled_value(contents: &str, label: &str) -> Option<String> {
    contents
        .lines()
        .find_map(|line| line.strip_prefix(label))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

//! Spotify Liked Tracks Crawler Library
//!
//! This library fetches the tracks a user saved in their Spotify library,
//! normalizes them into a small record shape and stores every record in a
//! key-value store (Redis) keyed by track id. It also contains the OAuth
//! authorization-code flow used to obtain the access token.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading from environment variables and `.env`
//! - `error` - The crate error type
//! - `management` - Credential storage and the track record store
//! - `pipeline` - The fetch, persist and report batch job
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use musicrawl::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> musicrawl::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     cli::sync(&config).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// All fallible operations in the crate report a [`Error`], so callers can
/// match on the failure kind (for example to tell an expired token apart from
/// a network outage) while still using `?` everywhere.
///
/// # Example
///
/// ```
/// use musicrawl::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Fetching liked tracks...");
/// info!("Found {} tracks", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// success!("Saved {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the program with exit code 1 right after printing. Only the
/// command layer uses it; library code returns [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, such as a single track that could not be
/// saved or a stored record that no longer decodes.
///
/// # Example
///
/// ```
/// warning!("Skipping corrupted record {}", key);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

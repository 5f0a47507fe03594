//! # CLI Module
//!
//! The command-line layer of musicrawl. Each command loads what it needs
//! from the [`crate::config::Config`], calls into the library and turns
//! failures into a red status line and exit code 1.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth authorization-code flow; writes the token file
//! - [`me`] - Prints the Spotify profile of the token's owner
//! - [`sync`] - Fetches liked tracks, stores them and prints the store
//! - [`list_tracks`] - Prints the store without contacting Spotify
//!
//! ## Typical Session
//!
//! ```bash
//! musicrawl auth      # once, opens the browser
//! musicrawl sync      # fetch + store + report
//! musicrawl tracks    # report only
//! ```
//!
//! The token is not refreshed. Once it expires, Spotify answers `401` and
//! `musicrawl auth` has to be run again.

mod auth;
mod me;
mod sync;
mod tracks;

pub use auth::auth;
pub use me::me;
pub use sync::sync;
pub use tracks::list_tracks;

//! Build script for the liked tracks crawler.
//!
//! Copies the `.env.example` template into the local data directory so a
//! fresh install finds a configuration sample next to the `.env` file it
//! reads at startup:
//! - Linux: `~/.local/share/musicrawl/.env.example`
//! - macOS: `~/Library/Application Support/musicrawl/.env.example`
//! - Windows: `%LOCALAPPDATA%/musicrawl/.env.example`
//!
//! A missing template only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut target_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    target_dir.push("musicrawl");

    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    fs::create_dir_all(&target_dir)?;
    fs::copy(&template, target_dir.join(".env.example"))?;

    Ok(())
}

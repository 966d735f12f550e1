//! Build script for the Spotify proxy.
//!
//! Copies `.env.example` into the platform-specific local data directory so
//! a configuration template sits next to where [`sporlproxy::config`] looks
//! for `.env`:
//! - Linux: `~/.local/share/sporlproxy/.env.example`
//! - macOS: `~/Library/Application Support/sporlproxy/.env.example`
//! - Windows: `%LOCALAPPDATA%/sporlproxy/.env.example`
//!
//! Nothing here is fatal: a missing template or a read-only data directory
//! only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=.env.example");

    if let Err(e) = copy_env_template() {
        println!("cargo:warning=could not install .env.example: {e}");
    }
}

fn copy_env_template() -> Result<(), Box<dyn std::error::Error>> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    if !template.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            template.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sporlproxy");
    fs::create_dir_all(&out_dir)?;
    fs::copy(&template, out_dir.join(".env.example"))?;

    Ok(())
}

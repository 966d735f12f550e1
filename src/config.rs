//! Configuration management for the Spotify proxy.
//!
//! This module loads configuration values from environment variables and
//! `.env` files and assembles them into a single [`Config`] value. The value
//! is built once at startup and shared with every request handler through the
//! router state, so nothing reads the environment after the server is up.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file (explicit path, working directory, or local data directory)
//! 3. Application defaults (where applicable)

use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

use thiserror::Error;

pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_REDIRECT_URI: &str = "REDIRECT_URI";
pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_CORS_ORIGIN: &str = "CORS_ORIGIN";
pub const ENV_SPOTIFY_API_URL: &str = "SPOTIFY_API_URL";
pub const ENV_SPOTIFY_ACCOUNTS_URL: &str = "SPOTIFY_ACCOUNTS_URL";
pub const ENV_SPOTIFY_MARKET: &str = "SPOTIFY_MARKET";
pub const ENV_SPOTIFY_LOCALE: &str = "SPOTIFY_LOCALE";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5500;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_MARKET: &str = "TW";
pub const DEFAULT_SPOTIFY_LOCALE: &str = "zh_TW";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("failed to load env file {path}: {reason}")]
    EnvFile { path: PathBuf, reason: String },
}

/// Process-wide configuration.
///
/// The upstream credentials (`client_id`, `client_secret`) never change for
/// the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// Must match the redirect URI registered in the Spotify application.
    pub redirect_uri: String,
    pub host: IpAddr,
    pub port: u16,
    /// Origin allowed by the CORS layer, usually the web client's dev server.
    pub cors_origin: String,
    /// Base URL relative endpoints are resolved against.
    pub api_url: String,
    /// Base URL of the accounts service (authorize + token endpoints).
    pub accounts_url: String,
    pub market: String,
    pub locale: String,
}

impl Config {
    /// Creates a configuration with the given credentials and defaults for
    /// everything else.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            market: DEFAULT_SPOTIFY_MARKET.to_string(),
            locale: DEFAULT_SPOTIFY_LOCALE.to_string(),
        }
    }

    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `CLIENT_ID`, `CLIENT_SECRET` or
    /// `REDIRECT_URI` is unset, and [`ConfigError::Invalid`] when `HOST` or
    /// `PORT` cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = optional(ENV_HOST, DEFAULT_HOST);
        let host = host.parse::<IpAddr>().map_err(|_| ConfigError::Invalid {
            key: ENV_HOST,
            value: host.clone(),
        })?;

        let port = match env::var(ENV_PORT) {
            Ok(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: ENV_PORT,
                value,
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            client_id: required(ENV_CLIENT_ID)?,
            client_secret: required(ENV_CLIENT_SECRET)?,
            redirect_uri: required(ENV_REDIRECT_URI)?,
            host,
            port,
            cors_origin: optional(ENV_CORS_ORIGIN, DEFAULT_CORS_ORIGIN),
            api_url: optional(ENV_SPOTIFY_API_URL, DEFAULT_SPOTIFY_API_URL),
            accounts_url: optional(ENV_SPOTIFY_ACCOUNTS_URL, DEFAULT_SPOTIFY_ACCOUNTS_URL),
            market: optional(ENV_SPOTIFY_MARKET, DEFAULT_SPOTIFY_MARKET),
            locale: optional(ENV_SPOTIFY_LOCALE, DEFAULT_SPOTIFY_LOCALE),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Spotify's OAuth token exchange URL.
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url.trim_end_matches('/'))
    }

    /// Spotify's OAuth authorization URL users are sent to.
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url.trim_end_matches('/'))
    }
}

/// Loads environment variables from a `.env` file.
///
/// An explicit path must exist. Without one, `./.env` is tried first and then
/// `sporlproxy/.env` in the platform-specific local data directory:
/// - Linux: `~/.local/share/sporlproxy/.env`
/// - macOS: `~/Library/Application Support/sporlproxy/.env`
/// - Windows: `%LOCALAPPDATA%/sporlproxy/.env`
///
/// Finding no file at all is fine, the variables may already be part of the
/// process environment.
///
/// # Returns
///
/// The path of the file that was loaded, if any.
///
/// # Errors
///
/// Fails when the explicit file is missing or any selected file cannot be
/// parsed.
pub fn load_env(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        return load_file(path).map(Some);
    }

    let candidates = [PathBuf::from(".env"), data_env_path()];
    for path in candidates {
        if path.is_file() {
            return load_file(&path).map(Some);
        }
    }

    Ok(None)
}

fn load_file(path: &Path) -> Result<PathBuf, ConfigError> {
    dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(path.to_path_buf())
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlproxy/.env");
    path
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_urls_are_derived_from_base() {
        let mut config = Config::new("id", "secret", "http://localhost:3000/callback");
        config.accounts_url = "http://127.0.0.1:9999/".to_string();

        assert_eq!(config.token_url(), "http://127.0.0.1:9999/api/token");
        assert_eq!(config.authorize_url(), "http://127.0.0.1:9999/authorize");
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::new("id", "secret", "uri");
        assert_eq!(config.port, 5500);
        assert_eq!(config.market, "TW");
        assert_eq!(config.locale, "zh_TW");
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:5500");
    }

    #[test]
    fn explicit_env_file_must_exist() {
        let result = load_env(Some(Path::new("/definitely/not/here/.env")));
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }
}

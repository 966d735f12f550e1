//! Spotify backend-for-frontend proxy library
//!
//! This library powers a small HTTP service that sits between a web player
//! client and the Spotify Web API. It performs the OAuth handshakes on behalf
//! of the client, forwards browse and library requests with the right bearer
//! or basic credentials, reshapes the JSON replies, and caches a couple of
//! anonymous browse endpoints in memory.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers and the token extractors they rely on
//! - `cache` - In-memory TTL cache for browse responses
//! - `config` - Configuration management and environment variables
//! - `error` - The tagged error type and its envelope rendering
//! - `logging` - Tracing subscriber setup
//! - `server` - Router assembly and the listening loop
//! - `spotify` - Spotify Web API client, token exchange and aggregation
//! - `types` - Data structures and type definitions
//! - `utils` - Random helpers and small utilities
//!
//! # Example
//!
//! ```
//! use sporlproxy::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlproxy::Res<()> {
//!     config::load_env(None)?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the process edges (startup, serving) where any error is fatal.
/// Request-level code uses [`error::ApiError`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Loaded environment from {}", path.display());
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
/// success!("Listening on {}", addr);
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
/// Only used for fatal startup errors where recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
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
/// # Example
///
/// ```
/// warning!("No .env file found, relying on process environment");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

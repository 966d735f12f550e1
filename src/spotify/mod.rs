//! # Spotify Integration Module
//!
//! Everything the proxy knows about the Spotify Web API and the Spotify
//! accounts service lives here. Route handlers never build upstream URLs or
//! headers themselves; they call one of the operations below with a token and
//! get back JSON ready to wrap in the response envelope.
//!
//! ## Layout
//!
//! ```text
//! api handlers
//!      ↓
//! ├── auth        authorize URL, code exchange, refresh, client credentials
//! ├── featured    home screen view (featured block + random categories)
//! ├── browse      categories, category playlists, playlist tracks, search
//! ├── library     profile, saved tracks, playlist edits, follows
//! │      ↓
//! ├── collection  "is this track saved" lookup, batched by ten
//! ├── fanout      parallel tasks joined back in input order
//! └── client      reqwest wrapper, URL resolution, error mapping
//!      ↓
//! Spotify Web API / accounts service
//! ```
//!
//! ## Tokens
//!
//! Public catalogue reads use an application token obtained with the
//! client-credentials grant. Anything touching a user's library takes the
//! user token the browser sent in `X-Access-Token`. Where both are in play
//! (playlist tracks, search) the catalogue read uses the application token and
//! only the saved-track lookup uses the user token.
//!
//! ## Errors
//!
//! All operations return [`crate::error::ApiError`]. Non-2xx replies and
//! transport failures become `Upstream`; failures of the token endpoint are
//! re-tagged as `Auth`. Nothing is retried.

pub mod auth;
pub mod browse;
pub mod client;
pub mod collection;
pub mod fanout;
pub mod featured;
pub mod library;

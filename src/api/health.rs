use axum::response::Json;
use serde_json::{Value, json};

pub const WELCOME_TEXT: &str = "Welcome to the Spotify proxy server";

pub async fn root() -> &'static str {
    WELCOME_TEXT
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

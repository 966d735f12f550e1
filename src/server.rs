use std::sync::Arc;

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    Res,
    api::{self, extract::ACCESS_TOKEN_HEADER},
    cache::ResponseCache,
    config::Config,
    spotify::client::SpotifyClient,
};

/// Prefix every API route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

/// Shared by every handler. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub spotify: SpotifyClient,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    /// State with a Spotify client pointed at `config.api_url` and an empty
    /// cache.
    pub fn new(config: Config) -> Res<Self> {
        let spotify = SpotifyClient::new(config.api_url.clone())?;
        Ok(Self::with_parts(config, spotify, ResponseCache::new()))
    }

    pub fn with_parts(config: Config, spotify: SpotifyClient, cache: ResponseCache) -> Self {
        Self {
            config: Arc::new(config),
            spotify,
            cache: Arc::new(cache),
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(api::auth::login))
        .route(
            "/auth/callback",
            post(api::auth::callback).put(api::auth::refresh),
        )
        .route("/featured-playlists", get(api::browse::featured_playlists))
        .route("/categories", get(api::browse::categories))
        .route("/categories/playlists", get(api::browse::category_playlists))
        .route(
            "/playlist/{playlist_id}/tracks",
            get(api::browse::playlist_tracks),
        )
        .route("/search", get(api::browse::search))
        .route("/user/me", post(api::user::me))
        .route("/user/playlists", post(api::user::playlists))
        .route("/user/tracks", get(api::user::tracks))
        .route(
            "/user/track/{track_id}/collection",
            put(api::user::save_track).delete(api::user::remove_track),
        )
        .route(
            "/user/playlists/{playlist_id}/track",
            post(api::user::add_playlist_track).delete(api::user::remove_playlist_track),
        )
        .route(
            "/user/playlist/{playlist_id}/follow",
            get(api::user::follow_status)
                .put(api::user::follow)
                .delete(api::user::unfollow),
        )
        .route(
            "/user/playlist/{playlist_id}/detail",
            put(api::user::update_detail),
        )
        .route("/user/playlist/create", post(api::user::create_playlist))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
            HeaderName::from_static("authentication"),
        ]);

    match HeaderValue::from_str(&config.cors_origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(e) => {
            tracing::warn!(origin = %config.cors_origin, error = %e, "ignoring invalid CORS origin");
            layer
        }
    }
}

/// Answers CORS preflights with `204 No Content` instead of the CORS
/// layer's `200`.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS
        && request
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = next.run(request).await;
    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

/// The complete application: API routes under [`API_PREFIX`], the root
/// greeting and the health check, wrapped in CORS and request tracing.
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(api::health::root))
        .route("/health", get(api::health::health))
        .nest(API_PREFIX, api_routes())
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is stopped.
pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = config.socket_addr();
    let app = build_app(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

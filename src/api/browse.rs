use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{OriginalUri, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    api::{
        ApiResult,
        extract::{ClientToken, MaybeUserToken, QueryParams},
        success,
    },
    cache::{BROWSE_CACHE_TTL, CachedResponse, ResponseCache},
    error::ApiError,
    server::AppState,
    spotify,
    types::{CategoryPlaylistsQuery, Envelope, SearchQuery},
};

/// `GET /featured-playlists`, cached. The app token is fetched on every
/// request, hit or miss.
pub async fn featured_playlists(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<BTreeMap<String, String>>,
    ClientToken(token): ClientToken,
) -> Response {
    let key = ResponseCache::key(uri.path(), &query);
    let state = &state;
    let token = &token;
    let cached = state
        .cache
        .get_or_compute(
            &key,
            move || async move {
                let result =
                    spotify::featured::featured_playlists(&state.spotify, token, &state.config)
                        .await
                        .map(Value::Array);
                render(result)
            },
            BROWSE_CACHE_TTL,
        )
        .await;

    (cached.status, Json(cached.body)).into_response()
}

/// `GET /categories`, cached like [`featured_playlists`].
pub async fn categories(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(query): QueryParams<BTreeMap<String, String>>,
    ClientToken(token): ClientToken,
) -> Response {
    let key = ResponseCache::key(uri.path(), &query);
    let state = &state;
    let token = &token;
    let cached = state
        .cache
        .get_or_compute(
            &key,
            move || async move {
                render(spotify::browse::categories(&state.spotify, token, &state.config).await)
            },
            BROWSE_CACHE_TTL,
        )
        .await;

    (cached.status, Json(cached.body)).into_response()
}

/// Renders a handler result the way [`ApiError`]'s `IntoResponse` would, but
/// as a value the cache can hold.
fn render(result: Result<Value, ApiError>) -> CachedResponse {
    let (status, envelope) = match result {
        Ok(data) => (StatusCode::OK, Envelope::success(data)),
        Err(err) => {
            tracing::warn!(error = %err, "browse request failed");
            (err.status(), Envelope::fail(err.to_string()))
        }
    };

    match serde_json::to_value(envelope) {
        Ok(body) => CachedResponse::new(status, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode browse response");
            CachedResponse::new(StatusCode::INTERNAL_SERVER_ERROR, Value::Null)
        }
    }
}

/// `GET /categories/playlists?category_id=&limit=&offset=`
pub async fn category_playlists(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CategoryPlaylistsQuery>,
) -> ApiResult {
    let category_id = query
        .category_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::validation("Invalid Request. category_id must be provided!"))?;

    let token = spotify::auth::client_credentials_token(&state.spotify, &state.config).await?;
    let playlists = spotify::browse::category_playlists(
        &state.spotify,
        &token,
        &state.config,
        &category_id,
        query.limit,
        query.offset,
    )
    .await?;
    success(playlists)
}

/// `GET /playlist/{playlist_id}/tracks`
pub async fn playlist_tracks(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
    MaybeUserToken(user_token): MaybeUserToken,
    ClientToken(app_token): ClientToken,
) -> ApiResult {
    let playlist = spotify::browse::playlist_tracks(
        &state.spotify,
        &app_token,
        user_token.as_ref(),
        &state.config,
        &playlist_id,
    )
    .await?;
    success(playlist)
}

/// `GET /search?q=`
pub async fn search(
    State(state): State<AppState>,
    MaybeUserToken(user_token): MaybeUserToken,
    QueryParams(query): QueryParams<SearchQuery>,
) -> ApiResult {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Please enter some text"))?;

    let token = spotify::auth::client_credentials_token(&state.spotify, &state.config).await?;
    let results = spotify::browse::search(
        &state.spotify,
        &token,
        user_token.as_ref(),
        &state.config,
        &q,
    )
    .await?;
    success(results)
}

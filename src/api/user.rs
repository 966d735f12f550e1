//! Routes acting on the caller's own library. All of them take the caller's
//! token through [`UserToken`].

use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::{
    api::{
        ApiResult,
        extract::{JsonBody, QueryParams, UserToken},
        success,
    },
    error::ApiError,
    server::AppState,
    spotify::library,
    types::{
        PageQuery, PlaylistDetailRequest, PlaylistTrackRequest, UserIdQuery, UserPlaylistsRequest,
    },
};

const USER_ID_REQUIRED: &str = "user_id must be required!";
const TRACK_ID_REQUIRED: &str = "track_id must be required!";

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(message))
}

/// `POST /user/me`
pub async fn me(State(state): State<AppState>, UserToken(token): UserToken) -> ApiResult {
    let profile = library::me(&state.spotify, &token).await?;
    success(profile)
}

/// `POST /user/playlists` with `{user_id, offset?, limit?}`.
pub async fn playlists(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    JsonBody(request): JsonBody<UserPlaylistsRequest>,
) -> ApiResult {
    let user_id = required(request.user_id, USER_ID_REQUIRED)?;
    let page = library::user_playlists(
        &state.spotify,
        &token,
        &user_id,
        request.offset,
        request.limit,
    )
    .await?;
    success(page)
}

/// `GET /user/tracks?offset=&limit=`
pub async fn tracks(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult {
    let tracks =
        library::saved_tracks(&state.spotify, &token, &state.config, page.offset, page.limit)
            .await?;
    success(tracks)
}

/// `PUT /user/track/{track_id}/collection`
pub async fn save_track(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(track_id): Path<String>,
) -> ApiResult {
    let track_id = required(Some(track_id), TRACK_ID_REQUIRED)?;
    library::save_track(&state.spotify, &token, &track_id).await?;
    success(Value::Null)
}

/// `DELETE /user/track/{track_id}/collection`
pub async fn remove_track(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(track_id): Path<String>,
) -> ApiResult {
    let track_id = required(Some(track_id), TRACK_ID_REQUIRED)?;
    library::remove_saved_track(&state.spotify, &token, &track_id).await?;
    success(Value::Null)
}

/// `POST /user/playlists/{playlist_id}/track` with `{track_id}`.
pub async fn add_playlist_track(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
    JsonBody(request): JsonBody<PlaylistTrackRequest>,
) -> ApiResult {
    let track_id = required(request.track_id, TRACK_ID_REQUIRED)?;
    library::add_playlist_track(&state.spotify, &token, &playlist_id, &track_id).await?;
    success(json!([]))
}

/// `DELETE /user/playlists/{playlist_id}/track` with `{track_id}`.
pub async fn remove_playlist_track(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
    JsonBody(request): JsonBody<PlaylistTrackRequest>,
) -> ApiResult {
    let track_id = required(request.track_id, TRACK_ID_REQUIRED)?;
    library::remove_playlist_track(&state.spotify, &token, &playlist_id, &track_id).await?;
    success(json!([]))
}

/// `GET /user/playlist/{playlist_id}/follow?user_id=`
pub async fn follow_status(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
    QueryParams(query): QueryParams<UserIdQuery>,
) -> ApiResult {
    let user_id = required(query.user_id, USER_ID_REQUIRED)?;
    let follows = library::follows_playlist(&state.spotify, &token, &playlist_id, &user_id).await?;
    success(follows)
}

/// `PUT /user/playlist/{playlist_id}/follow`
pub async fn follow(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
) -> ApiResult {
    library::follow_playlist(&state.spotify, &token, &playlist_id).await?;
    success(Value::Null)
}

/// `DELETE /user/playlist/{playlist_id}/follow`
pub async fn unfollow(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
) -> ApiResult {
    library::unfollow_playlist(&state.spotify, &token, &playlist_id).await?;
    success(Value::Null)
}

/// `PUT /user/playlist/{playlist_id}/detail` with `{name?, description?,
/// public?}`.
pub async fn update_detail(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    Path(playlist_id): Path<String>,
    JsonBody(changes): JsonBody<PlaylistDetailRequest>,
) -> ApiResult {
    library::update_playlist_detail(&state.spotify, &token, &state.config, &playlist_id, &changes)
        .await?;
    success(Value::Null)
}

/// `POST /user/playlist/create?user_id=`
pub async fn create_playlist(
    State(state): State<AppState>,
    UserToken(token): UserToken,
    QueryParams(query): QueryParams<UserIdQuery>,
) -> ApiResult {
    let user_id = required(query.user_id, USER_ID_REQUIRED)?;
    library::create_playlist(&state.spotify, &token, &user_id).await?;
    success(Value::Null)
}

use axum::extract::State;

use crate::{
    api::{ApiResult, extract::JsonBody, success},
    error::ApiError,
    server::AppState,
    spotify,
    types::{CallbackRequest, LoginResponse, RefreshRequest},
};

/// `POST /auth/login`: the authorization URL and the CSRF state the client
/// must send back on callback.
pub async fn login(State(state): State<AppState>) -> ApiResult {
    let (url, csrf_state) = spotify::auth::login(&state.config)?;
    tracing::debug!("issued authorization url");
    success(LoginResponse { url, csrf_state })
}

/// `POST /auth/callback`: exchanges the authorization code for tokens. The
/// granted scope is not passed on to the client.
pub async fn callback(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CallbackRequest>,
) -> ApiResult {
    if request.state.is_empty() {
        return Err(ApiError::auth("state_mismatch"));
    }

    let mut tokens = spotify::auth::exchange_code(&state.spotify, &state.config, &request.code).await?;
    tokens.scope = None;
    success(tokens)
}

/// `PUT /auth/callback`: trades a refresh token for a new access token.
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> ApiResult {
    let refresh_token = request
        .refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::auth("refresh_token must be provided."))?;

    let tokens =
        spotify::auth::refresh_access_token(&state.spotify, &state.config, &refresh_token).await?;
    success(tokens)
}

//! Request extractors shared by the handlers.
//!
//! Token extractors run before the handler body, so a request rejected here
//! never reaches the Spotify API.

use axum::{
    extract::{FromRequest, FromRequestParts, Json, Query},
    http::request::Parts,
};

use crate::{error::ApiError, server::AppState, spotify, types::AccessToken};

/// Header carrying the caller's Spotify bearer token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Message of the 401 sent when a user route is called without a token.
pub const AUTHORIZATION_DENIED: &str = "Authorization denied!";

/// An application token, freshly fetched with the client-credentials grant.
#[derive(Debug, Clone)]
pub struct ClientToken(pub AccessToken);

impl FromRequestParts<AppState> for ClientToken {
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = spotify::auth::client_credentials_token(&state.spotify, &state.config).await?;
        Ok(Self(token))
    }
}

/// The caller's token from `X-Access-Token`. Required.
#[derive(Debug, Clone)]
pub struct UserToken(pub AccessToken);

impl<S> FromRequestParts<S> for UserToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_token(parts)
            .map(Self)
            .ok_or_else(|| ApiError::auth(AUTHORIZATION_DENIED))
    }
}

/// The caller's token from `X-Access-Token`, if any.
#[derive(Debug, Clone)]
pub struct MaybeUserToken(pub Option<AccessToken>);

impl<S> FromRequestParts<S> for MaybeUserToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(header_token(parts)))
    }
}

fn header_token(parts: &Parts) -> Option<AccessToken> {
    parts
        .headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(AccessToken::user)
}

/// `Json` whose rejection is a `FAIL` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `Query` whose rejection is a `FAIL` envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

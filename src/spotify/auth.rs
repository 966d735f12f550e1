use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{
    Url,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;

use crate::{
    config::Config,
    error::ApiError,
    spotify::client::SpotifyClient,
    types::{AccessToken, TokenResponse},
    utils,
};

/// Permissions the web player asks users for.
pub const AUTHORIZATION_SCOPES: [&str; 10] = [
    "user-top-read",
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "user-library-modify",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
    "streaming",
];

/// Length of the anti-forgery state handed out by the login route.
pub const CSRF_STATE_LENGTH: usize = 48;

/// `Authorization: Basic base64(client_id:client_secret)`.
pub fn basic_auth_headers(client_id: &str, client_secret: &str) -> HeaderMap {
    let encoded = STANDARD.encode(format!("{client_id}:{client_secret}"));
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Basic {encoded}")) {
        headers.insert(AUTHORIZATION, value);
    }
    headers
}

/// Builds the URL users are sent to in order to grant the application
/// access. The consent dialog is always shown.
///
/// # Errors
///
/// Fails when the configured accounts URL is not a valid URL.
pub fn authorize_url(config: &Config, csrf_state: &str) -> Result<String, ApiError> {
    let scope = AUTHORIZATION_SCOPES.join(" ");
    let url = Url::parse_with_params(
        &config.authorize_url(),
        &[
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("state", csrf_state),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("show_dialog", "true"),
        ],
    )
    .map_err(|e| ApiError::auth(format!("Invalid authorization URL: {e}")))?;

    Ok(url.to_string())
}

/// Generates a fresh CSRF state and the matching authorization URL.
pub fn login(config: &Config) -> Result<(String, String), ApiError> {
    let csrf_state = utils::generate_random_string(CSRF_STATE_LENGTH);
    let url = authorize_url(config, &csrf_state)?;
    Ok((url, csrf_state))
}

/// Fetches an application token via the client-credentials grant.
///
/// Called once per anonymous browse request; the token is not reused across
/// requests.
///
/// # Errors
///
/// Any failure of the exchange, or a reply without `access_token`, is an
/// [`ApiError::Auth`].
pub async fn client_credentials_token(
    client: &SpotifyClient,
    config: &Config,
) -> Result<AccessToken, ApiError> {
    let token = request_token(client, config, &[("grant_type", "client_credentials")]).await?;

    token
        .access_token
        .filter(|t| !t.is_empty())
        .map(AccessToken::client_credentials)
        .ok_or_else(|| ApiError::auth("Fail to get client_credentials!"))
}

/// Exchanges an authorization code for access and refresh tokens.
pub async fn exchange_code(
    client: &SpotifyClient,
    config: &Config,
    code: &str,
) -> Result<TokenResponse, ApiError> {
    request_token(
        client,
        config,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh_access_token(
    client: &SpotifyClient,
    config: &Config,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    request_token(
        client,
        config,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ],
    )
    .await
}

async fn request_token(
    client: &SpotifyClient,
    config: &Config,
    form: &[(&str, &str)],
) -> Result<TokenResponse, ApiError> {
    let headers = basic_auth_headers(&config.client_id, &config.client_secret);
    let reply: Value = client
        .post_form(&config.token_url(), form, headers)
        .await
        .map_err(ApiError::into_auth)?;

    serde_json::from_value(reply)
        .map_err(|e| ApiError::auth(format!("Unexpected token response: {e}")))
}

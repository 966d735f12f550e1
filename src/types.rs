use axum::http::{HeaderMap, HeaderValue, header};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnvelopeStatus {
    Success,
    Fail,
}

/// Uniform response body of every API route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: EnvelopeStatus,
    pub error: Option<String>,
    pub data: Value,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            status: EnvelopeStatus::Success,
            error: None,
            data,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            status: EnvelopeStatus::Fail,
            error: Some(error.into()),
            data: Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ClientCredentials,
    User,
}

/// A bearer token used against the Spotify Web API.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub kind: TokenKind,
}

impl AccessToken {
    pub fn client_credentials(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TokenKind::ClientCredentials,
        }
    }

    pub fn user(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: TokenKind::User,
        }
    }

    /// `Authorization: Bearer <token>` as a header map ready to pass to the
    /// upstream client.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.value)) {
            headers.insert(header::AUTHORIZATION, value);
        }
        headers
    }

    /// Bearer headers plus `Content-Type: application/json`, for calls whose
    /// body the upstream expects as JSON.
    pub fn json_headers(&self) -> HeaderMap {
        let mut headers = self.headers();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers
    }
}

/// Reply of the accounts token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub url: String,
    pub csrf_state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackRequest {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPlaylistsQuery {
    pub category_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPlaylistsRequest {
    pub user_id: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistTrackRequest {
    pub track_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistDetailRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
}

/// Profile fields handed back to the client by `/user/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: Option<String>,
    pub token: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

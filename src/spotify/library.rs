use serde_json::{Value, json};

use crate::{
    config::Config,
    error::ApiError,
    spotify::{
        client::{SpotifyClient, params},
        collection,
    },
    types::{AccessToken, PlaylistDetailRequest, UserProfile},
};

/// Name given to playlists created from the client.
pub const NEW_PLAYLIST_NAME: &str = "# 新播放清單";

const DEFAULT_PAGE_LIMIT: u32 = 20;

/// The caller's profile, echoed back together with the token it was read
/// with.
pub async fn me(client: &SpotifyClient, token: &AccessToken) -> Result<UserProfile, ApiError> {
    let profile = client.get("/v1/me", None, token.headers()).await?;
    let field = |name: &str| profile.get(name).and_then(Value::as_str).map(str::to_string);

    Ok(UserProfile {
        user_id: field("id"),
        token: token.value.clone(),
        display_name: field("display_name"),
        email: field("email"),
    })
}

pub async fn user_playlists(
    client: &SpotifyClient,
    token: &AccessToken,
    user_id: &str,
    offset: Option<u32>,
    limit: Option<u32>,
) -> Result<Value, ApiError> {
    let query = params(json!({
        "offset": offset.unwrap_or(0),
        "limit": limit.unwrap_or(DEFAULT_PAGE_LIMIT),
    }));
    client
        .get(
            &format!("/v1/users/{user_id}/playlists"),
            Some(&query),
            token.headers(),
        )
        .await
}

/// The caller's saved tracks, reshaped to `{added_at, track}` with
/// `is_collected` on each track.
pub async fn saved_tracks(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
    offset: Option<u32>,
    limit: Option<u32>,
) -> Result<Value, ApiError> {
    let query = params(json!({
        "offset": offset.unwrap_or(0),
        "limit": limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        "market": config.market,
    }));
    let mut page = client.get("/v1/me/tracks", Some(&query), token.headers()).await?;

    let items = page
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut tracks: Vec<Value> = items
        .iter()
        .map(|item| item.get("track").cloned().unwrap_or(Value::Null))
        .collect();
    let ids: Vec<String> = tracks.iter().map(collection::track_id).collect();
    let flags = collection::collected_flags(client, token, &ids).await?;
    collection::mark_collected(&mut tracks, &flags);

    let reshaped: Vec<Value> = items
        .iter()
        .zip(tracks)
        .map(|(item, track)| {
            json!({
                "added_at": item.get("added_at").cloned().unwrap_or(Value::Null),
                "track": track,
            })
        })
        .collect();

    if let Value::Object(map) = &mut page {
        map.insert("items".to_string(), Value::Array(reshaped));
    }
    Ok(page)
}

pub async fn save_track(
    client: &SpotifyClient,
    token: &AccessToken,
    track_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({ "ids": [track_id] }));
    client
        .put("/v1/me/tracks", Some(&body), token.json_headers())
        .await?;
    Ok(())
}

pub async fn remove_saved_track(
    client: &SpotifyClient,
    token: &AccessToken,
    track_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({ "ids": [track_id] }));
    client
        .delete("/v1/me/tracks", Some(&body), token.json_headers())
        .await?;
    Ok(())
}

pub fn track_uri(track_id: &str) -> String {
    format!("spotify:track:{track_id}")
}

/// Inserts a track at the top of a playlist.
pub async fn add_playlist_track(
    client: &SpotifyClient,
    token: &AccessToken,
    playlist_id: &str,
    track_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({
        "uris": [track_uri(track_id)],
        "position": 0,
    }));
    client
        .post(
            &format!("/v1/playlists/{playlist_id}/tracks"),
            Some(&body),
            token.json_headers(),
        )
        .await?;
    Ok(())
}

pub async fn remove_playlist_track(
    client: &SpotifyClient,
    token: &AccessToken,
    playlist_id: &str,
    track_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({
        "tracks": [{ "uri": track_uri(track_id) }],
    }));
    client
        .delete(
            &format!("/v1/playlists/{playlist_id}/tracks"),
            Some(&body),
            token.json_headers(),
        )
        .await?;
    Ok(())
}

/// Whether `user_id` follows the playlist, as the upstream's one-element
/// boolean array.
pub async fn follows_playlist(
    client: &SpotifyClient,
    token: &AccessToken,
    playlist_id: &str,
    user_id: &str,
) -> Result<Value, ApiError> {
    let query = params(json!({ "ids": user_id }));
    client
        .get(
            &format!("/v1/playlists/{playlist_id}/followers/contains"),
            Some(&query),
            token.headers(),
        )
        .await
}

pub async fn follow_playlist(
    client: &SpotifyClient,
    token: &AccessToken,
    playlist_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({ "public": true }));
    client
        .put(
            &format!("/v1/playlists/{playlist_id}/followers"),
            Some(&body),
            token.json_headers(),
        )
        .await?;
    Ok(())
}

pub async fn unfollow_playlist(
    client: &SpotifyClient,
    token: &AccessToken,
    playlist_id: &str,
) -> Result<(), ApiError> {
    client
        .delete(
            &format!("/v1/playlists/{playlist_id}/followers"),
            None,
            token.headers(),
        )
        .await?;
    Ok(())
}

/// Updates name, visibility and description. Fields left out of `changes`
/// keep their current value.
pub async fn update_playlist_detail(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
    playlist_id: &str,
    changes: &PlaylistDetailRequest,
) -> Result<(), ApiError> {
    let endpoint = format!("/v1/playlists/{playlist_id}");
    let query = params(json!({
        "market": config.market,
        "additional_types": "track",
    }));
    let current = client.get(&endpoint, Some(&query), token.headers()).await?;

    let body = params(merge_playlist_detail(&current, changes));
    client
        .put(&endpoint, Some(&body), token.json_headers())
        .await?;
    Ok(())
}

/// `{name, public, description?}` from the requested changes over the
/// current playlist. An empty description is left out.
pub fn merge_playlist_detail(current: &Value, changes: &PlaylistDetailRequest) -> Value {
    let name = changes
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| current.get("name").and_then(Value::as_str).map(str::to_string));
    let public = changes
        .public
        .or_else(|| current.get("public").and_then(Value::as_bool));
    let description = changes
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .or_else(|| {
            current
                .get("description")
                .and_then(Value::as_str)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        });

    let mut body = json!({ "name": name, "public": public });
    if let (Some(description), Value::Object(map)) = (description, &mut body) {
        map.insert("description".to_string(), Value::String(description));
    }
    body
}

pub async fn create_playlist(
    client: &SpotifyClient,
    token: &AccessToken,
    user_id: &str,
) -> Result<(), ApiError> {
    let body = params(json!({
        "name": NEW_PLAYLIST_NAME,
        "public": true,
    }));
    client
        .post(
            &format!("/v1/users/{user_id}/playlists"),
            Some(&body),
            token.json_headers(),
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_keeps_current_values() {
        let current = json!({"name": "Road trip", "public": true, "description": "songs"});
        let body = merge_playlist_detail(&current, &PlaylistDetailRequest::default());
        assert_eq!(body, json!({"name": "Road trip", "public": true, "description": "songs"}));
    }

    #[test]
    fn detail_applies_explicit_changes() {
        let current = json!({"name": "Road trip", "public": true, "description": null});
        let changes = PlaylistDetailRequest {
            name: Some("Night drive".into()),
            description: None,
            public: Some(false),
        };
        let body = merge_playlist_detail(&current, &changes);
        assert_eq!(body, json!({"name": "Night drive", "public": false}));
    }

    #[test]
    fn track_uri_format() {
        assert_eq!(track_uri("abc"), "spotify:track:abc");
    }
}

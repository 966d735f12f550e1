use serde_json::{Map, Value, json};

use crate::{
    config::Config,
    error::ApiError,
    spotify::{
        client::{SpotifyClient, params},
        collection,
    },
    types::AccessToken,
    utils,
};

const CATEGORY_LIST_LIMIT: u32 = 50;
const CATEGORY_PLAYLISTS_DEFAULT_LIMIT: u32 = 50;
const SEARCH_LIMIT: u32 = 10;

/// Browse categories, each tinted with a random palette color.
pub async fn categories(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
) -> Result<Value, ApiError> {
    let query = params(json!({
        "country": config.market,
        "locale": config.locale,
        "limit": CATEGORY_LIST_LIMIT,
    }));
    let reply = client
        .get("/v1/browse/categories", Some(&query), token.headers())
        .await?;

    Ok(color_categories(reply.get("categories")))
}

/// `{...categories, items: [{...item, color}]}`.
pub fn color_categories(categories: Option<&Value>) -> Value {
    let mut page = match categories {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };

    let items: Vec<Value> = page
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|mut item| {
            if let Value::Object(map) = &mut item {
                map.insert("color".to_string(), Value::from(utils::random_color()));
            }
            item
        })
        .collect();
    page.insert("items".to_string(), Value::Array(items));

    Value::Object(page)
}

/// Playlists of one category, labeled with the category's display name.
pub async fn category_playlists(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
    category_id: &str,
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Value, ApiError> {
    let detail_query = params(json!({
        "locale": config.locale,
        "country": config.market,
    }));
    let category = client
        .get(
            &format!("/v1/browse/categories/{category_id}"),
            Some(&detail_query),
            token.headers(),
        )
        .await?;

    let playlists_query = params(json!({
        "country": config.market,
        "limit": limit.unwrap_or(CATEGORY_PLAYLISTS_DEFAULT_LIMIT),
        "offset": offset.unwrap_or(0),
    }));
    let playlists = client
        .get(
            &format!("/v1/browse/categories/{category_id}/playlists"),
            Some(&playlists_query),
            token.headers(),
        )
        .await?;

    Ok(with_category_name(playlists, category.get("name")))
}

/// `{...playlists, name}`; the name wins over any `name` already present.
pub fn with_category_name(playlists: Value, name: Option<&Value>) -> Value {
    let mut merged = match playlists {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    merged.insert(
        "name".to_string(),
        name.cloned().unwrap_or(Value::Null),
    );
    Value::Object(merged)
}

/// A playlist with its tracks. With a user token each track item gains
/// `is_collected`; without one the upstream reply is returned untouched.
pub async fn playlist_tracks(
    client: &SpotifyClient,
    app_token: &AccessToken,
    user_token: Option<&AccessToken>,
    config: &Config,
    playlist_id: &str,
) -> Result<Value, ApiError> {
    let query = params(json!({
        "market": config.market,
        "additional_types": "track",
    }));
    let mut playlist = client
        .get(
            &format!("/v1/playlists/{playlist_id}"),
            Some(&query),
            app_token.headers(),
        )
        .await?;

    let Some(user_token) = user_token else {
        return Ok(playlist);
    };

    let ids: Vec<String> = match playlist.pointer("/tracks/items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items
            .iter()
            .map(|item| collection::track_id(item.get("track").unwrap_or(&Value::Null)))
            .collect(),
        _ => return Ok(playlist),
    };

    let flags = collection::collected_flags(client, user_token, &ids).await?;
    if let Some(items) = playlist
        .pointer_mut("/tracks/items")
        .and_then(Value::as_array_mut)
    {
        collection::mark_collected(items, &flags);
    }

    Ok(playlist)
}

/// Playlists and tracks matching `q`. Tracks always carry `is_collected`,
/// which is only ever `true` when a user token was supplied.
pub async fn search(
    client: &SpotifyClient,
    app_token: &AccessToken,
    user_token: Option<&AccessToken>,
    config: &Config,
    q: &str,
) -> Result<Value, ApiError> {
    let query = params(json!({
        "country": config.market,
        "include_external": "audio",
        "limit": SEARCH_LIMIT,
        "offset": 0,
        "type": "playlist,track",
        "q": q,
    }));
    let reply = client
        .get("/v1/search", Some(&query), app_token.headers())
        .await?;

    let playlists = items_at(&reply, "/playlists/items");
    let mut tracks = items_at(&reply, "/tracks/items");

    let flags = match user_token {
        Some(token) => {
            let ids: Vec<String> = tracks.iter().map(collection::track_id).collect();
            collection::collected_flags(client, token, &ids).await?
        }
        None => Vec::new(),
    };
    collection::mark_collected(&mut tracks, &flags);

    Ok(json!({
        "playlists": playlists,
        "tracks": tracks,
    }))
}

fn items_at(reply: &Value, pointer: &str) -> Vec<Value> {
    reply
        .pointer(pointer)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::COLOR_LIST;

    #[test]
    fn categories_get_palette_colors() {
        let page = json!({"items": [{"id": "pop"}, {"id": "rock"}], "total": 2});
        let colored = color_categories(Some(&page));

        assert_eq!(colored["total"], 2);
        for item in colored["items"].as_array().unwrap() {
            let color = item["color"].as_str().unwrap();
            assert!(COLOR_LIST.contains(&color));
        }
    }

    #[test]
    fn category_name_overrides() {
        let merged = with_category_name(
            json!({"items": [], "name": "stale"}),
            Some(&json!("Pop")),
        );
        assert_eq!(merged, json!({"items": [], "name": "Pop"}));
    }
}

//! The home screen's "featured content" view.
//!
//! One block of featured playlists followed by the playlists of a few
//! randomly picked categories. The category part is best effort: if any of
//! its calls fails, the whole augmentation is dropped and only the featured
//! block is returned.

use serde_json::{Map, Value, json};

use crate::{
    config::Config,
    error::ApiError,
    spotify::{
        client::{SpotifyClient, params},
        fanout,
    },
    types::AccessToken,
    utils,
};

/// Display name of the leading featured block.
pub const FEATURED_BLOCK_NAME: &str = "為你打造";

/// Number of categories shown under the featured block.
pub const FEATURED_CATEGORY_COUNT: usize = 4;

const FEATURED_PLAYLIST_LIMIT: u32 = 5;
const CATEGORY_LIST_LIMIT: u32 = 50;

/// Fetches the featured block and a random selection of category blocks.
///
/// # Errors
///
/// Only failures of the featured playlists or the category list propagate.
pub async fn featured_playlists(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
) -> Result<Vec<Value>, ApiError> {
    let featured_query = params(json!({
        "country": config.market,
        "locale": config.locale,
        "limit": FEATURED_PLAYLIST_LIMIT,
        "offset": 0,
    }));
    let categories_query = params(json!({
        "country": config.market,
        "locale": config.locale,
        "limit": CATEGORY_LIST_LIMIT,
    }));

    let (featured, categories) = tokio::try_join!(
        client.get(
            "/v1/browse/featured-playlists",
            Some(&featured_query),
            token.headers()
        ),
        client.get(
            "/v1/browse/categories",
            Some(&categories_query),
            token.headers()
        ),
    )?;

    let selected = pick_categories(&categories);
    let category_blocks = match category_blocks(client, token, config, &selected).await {
        Ok(blocks) => blocks,
        Err(e) => {
            tracing::warn!(error = %e, "dropping category playlists from featured view");
            Vec::new()
        }
    };

    let mut blocks = Vec::with_capacity(1 + category_blocks.len());
    blocks.push(labeled_block(
        FEATURED_BLOCK_NAME,
        "",
        featured.get("playlists"),
    ));
    blocks.extend(category_blocks);
    Ok(blocks)
}

/// Picks [`FEATURED_CATEGORY_COUNT`] distinct categories from a categories
/// reply, or none when there are not enough to choose from.
pub fn pick_categories(categories: &Value) -> Vec<Value> {
    let items = categories
        .pointer("/categories/items")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    utils::generate_random_numbers(FEATURED_CATEGORY_COUNT - 1, items.len(), 0)
        .into_iter()
        .filter_map(|idx| items.get(idx).cloned())
        .collect()
}

async fn category_blocks(
    client: &SpotifyClient,
    token: &AccessToken,
    config: &Config,
    selected: &[Value],
) -> Result<Vec<Value>, ApiError> {
    let handles = fanout::spawn_all(selected.iter().map(|category| {
        let client = client.clone();
        let headers = token.headers();
        let endpoint = format!("/v1/browse/categories/{}/playlists", string_field(category, "id"));
        let query = params(json!({
            "country": config.market,
            "locale": config.locale,
            "limit": FEATURED_PLAYLIST_LIMIT,
        }));
        async move { client.get(&endpoint, Some(&query), headers).await }
    }));

    let replies = fanout::join_in_order(handles).await?;
    Ok(selected
        .iter()
        .zip(replies)
        .map(|(category, reply)| {
            labeled_block(
                &string_field(category, "name"),
                &string_field(category, "id"),
                reply.get("playlists"),
            )
        })
        .collect())
}

/// `{name, id, ...playlists}`. Fields of the playlists page win over the
/// labels.
pub fn labeled_block(name: &str, id: &str, playlists: Option<&Value>) -> Value {
    let mut block = Map::new();
    block.insert("name".to_string(), Value::from(name));
    block.insert("id".to_string(), Value::from(id));

    if let Some(Value::Object(page)) = playlists {
        block.extend(page.clone());
    }

    Value::Object(block)
}

fn string_field(value: &Value, field: &str) -> String {
    value
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

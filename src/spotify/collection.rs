//! "Is this track saved in my library" enrichment.
//!
//! The contains endpoint accepts at most ten ids per call, so a list of N
//! tracks is split into `ceil(N / 10)` ordered groups that are looked up in
//! parallel. The per-group answers are concatenated in group order, which puts
//! answer *i* next to track *i* again.

use serde_json::{Value, json};

use crate::{
    error::ApiError,
    spotify::{
        client::{SpotifyClient, params},
        fanout,
    },
    types::AccessToken,
};

/// Hard limit of ids per contains call.
pub const CONTAINS_BATCH_SIZE: usize = 10;

const CONTAINS_ENDPOINT: &str = "/v1/me/tracks/contains";

/// Splits ids into ordered groups of at most [`CONTAINS_BATCH_SIZE`].
pub fn batch_groups(ids: &[String]) -> Vec<Vec<String>> {
    ids.chunks(CONTAINS_BATCH_SIZE)
        .map(|chunk| chunk.to_vec())
        .collect()
}

/// Looks up which of `ids` are saved in the library of `token`'s user.
///
/// The returned flags are aligned with `ids`. An empty input issues no calls.
///
/// # Errors
///
/// Fails as a whole if any batch fails; partial answers are discarded.
pub async fn collected_flags(
    client: &SpotifyClient,
    token: &AccessToken,
    ids: &[String],
) -> Result<Vec<bool>, ApiError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let groups = batch_groups(ids);
    tracing::debug!(ids = ids.len(), groups = groups.len(), "checking saved tracks");

    let handles = fanout::spawn_all(groups.into_iter().map(|group| {
        let client = client.clone();
        let headers = token.headers();
        async move {
            let query = params(json!({ "ids": group.join(",") }));
            client.get(CONTAINS_ENDPOINT, Some(&query), headers).await
        }
    }));

    let answers = fanout::join_in_order(handles).await?;
    Ok(flatten_flags(&answers))
}

/// Concatenates per-group answers. Non-boolean entries count as `false`.
pub fn flatten_flags(answers: &[Value]) -> Vec<bool> {
    answers
        .iter()
        .filter_map(Value::as_array)
        .flatten()
        .map(|v| v.as_bool().unwrap_or(false))
        .collect()
}

/// Sets `is_collected` on every object in `items` from the flag at the same
/// position, `false` where the flags run short.
pub fn mark_collected(items: &mut [Value], flags: &[bool]) {
    for (idx, item) in items.iter_mut().enumerate() {
        if let Value::Object(map) = item {
            let collected = flags.get(idx).copied().unwrap_or(false);
            map.insert("is_collected".to_string(), Value::Bool(collected));
        }
    }
}

/// `id` of a track object, empty when missing (local files have none).
pub fn track_id(track: &Value) -> String {
    track
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

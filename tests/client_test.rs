use reqwest::{Method, header::HeaderMap};
use serde_json::{Value, json};
use sporlproxy::{
    error::ApiError,
    spotify::client::{SpotifyClient, params},
    types::AccessToken,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[test]
fn test_absolute_url_bypasses_base() {
    let client = SpotifyClient::new("https://api.spotify.com").unwrap();
    let request = client
        .request(Method::GET, "https://example.com/x", None, HeaderMap::new())
        .build()
        .unwrap();

    assert_eq!(request.url().as_str(), "https://example.com/x");
}

#[test]
fn test_relative_url_resolves_against_base() {
    let client = SpotifyClient::new("https://api.spotify.com/").unwrap();

    for endpoint in ["/v1/foo", "v1/foo"] {
        let request = client
            .request(Method::GET, endpoint, None, HeaderMap::new())
            .build()
            .unwrap();
        assert_eq!(request.url().as_str(), "https://api.spotify.com/v1/foo");
    }
}

#[test]
fn test_get_sends_query_and_no_body() {
    let client = SpotifyClient::new("https://api.spotify.com").unwrap();
    let p = params(json!({"ids": ["a", "b"], "market": "TW"}));
    let request = client
        .request(Method::GET, "/v1/me/tracks/contains", Some(&p), HeaderMap::new())
        .build()
        .unwrap();

    let query: Vec<(String, String)> = request.url().query_pairs().into_owned().collect();
    assert!(query.contains(&("ids".to_string(), "a,b".to_string())));
    assert!(query.contains(&("market".to_string(), "TW".to_string())));
    assert!(request.body().is_none());
}

#[test]
fn test_non_get_sends_body_and_no_query() {
    let client = SpotifyClient::new("https://api.spotify.com").unwrap();
    let p = params(json!({"ids": ["a"]}));
    let request = client
        .request(Method::PUT, "/v1/me/tracks", Some(&p), HeaderMap::new())
        .build()
        .unwrap();

    assert!(request.url().query().is_none());
    let body = request.body().and_then(|b| b.as_bytes()).unwrap();
    assert_eq!(serde_json::from_slice::<Value>(body).unwrap(), json!({"ids": ["a"]}));
}

#[tokio::test]
async fn test_caller_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/v1/me/tracks"))
        .and(header("authorization", "Bearer user-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"ids": ["abc"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::new(server.uri()).unwrap();
    let token = AccessToken::user("user-token");
    let body = params(json!({"ids": ["abc"]}));
    let reply = client
        .put("/v1/me/tracks", Some(&body), token.json_headers())
        .await
        .unwrap();

    // empty body
    assert_eq!(reply, Value::Null);
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .and(header("accept", "application/json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(query_param("market", "TW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "me"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SpotifyClient::new(server.uri()).unwrap();
    let reply = client
        .get("/v1/me", Some(&params(json!({"market": "TW"}))), HeaderMap::new())
        .await
        .unwrap();

    assert_eq!(reply, json!({"id": "me"}));
}

#[tokio::test]
async fn test_error_status_becomes_upstream_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"status": 401, "message": "The access token expired"}
        })))
        .mount(&server)
        .await;

    let client = SpotifyClient::new(server.uri()).unwrap();
    let err = client.get("/v1/me", None, HeaderMap::new()).await.unwrap_err();

    match err {
        ApiError::Upstream {
            status,
            message,
            body,
        } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "The access token expired");
            assert!(body.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_body_gets_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/playlists/p1/followers"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = SpotifyClient::new(server.uri()).unwrap();
    let err = client
        .delete("/v1/playlists/p1/followers", None, HeaderMap::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status code 502");
    assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
}

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{setup, As, LIST_URL, OTHER_API_KEY, PLACE};

#[tokio::test]
async fn test_health_check() {
    let t = setup().await;
    let (status, body) = t.get("/health", As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let t = setup().await;
    let response = t
        .app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert_eq!(response.headers()["x-frame-options"], "DENY");
    assert!(response.headers().get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_rendered_references_resolve() {
    let t = setup().await;
    let event = t.create_with_post(As::User(&t.user), &t.complex_event()).await;

    let (status, place) = t.get(event["location"]["@id"].as_str().unwrap(), As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(place["data"]["id"], PLACE);
    assert_eq!(place["data"]["@type"], "Place");

    let (status, keyword) = t
        .get(event["audience"][0]["@id"].as_str().unwrap(), As::Anonymous)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(keyword["data"]["id"], "test:audience");
}

#[tokio::test]
async fn test_missing_resources_are_not_found() {
    let t = setup().await;
    for path in ["/v1/event/system:missing/", "/v1/place/missing/", "/v1/keyword/missing/"] {
        let (status, body) = t.get(path, As::Anonymous).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn test_drafts_are_listed_only_for_their_publisher() {
    let t = setup().await;
    let mut draft = t.minimal_event();
    draft["publication_status"] = json!("draft");
    t.create_with_post(As::User(&t.user), &draft).await;
    t.create_with_post(As::User(&t.user), &t.minimal_event()).await;

    let (status, body) = t.get(LIST_URL, As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);

    let (_, body) = t.get(LIST_URL, As::User(&t.user)).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);

    let (_, body) = t.get(LIST_URL, As::User(&t.user2)).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_key_sees_drafts_of_its_owner() {
    let t = setup().await;
    let mut draft = t.minimal_event();
    draft["publication_status"] = json!("draft");
    let created = t.create_with_post(As::ApiKey(OTHER_API_KEY), &draft).await;
    let url = created["@id"].as_str().unwrap();

    let (status, _) = t.get(url, As::ApiKey(OTHER_API_KEY)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t.get(url, As::User(&t.user2)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t.get(url, As::User(&t.user)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_credentials_on_read_are_rejected() {
    let t = setup().await;
    let (status, _) = t.get(LIST_URL, As::ApiKey("unknown")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_event_list_is_paginated() {
    let t = setup().await;
    for _ in 0..3 {
        t.create_with_post(As::User(&t.user), &t.minimal_event()).await;
    }

    let (status, body) = t.get("/v1/event/?page_size=2", As::Anonymous).await;
    assert_eq!(status, StatusCode::OK);
    let meta = &body["data"]["meta"];
    assert_eq!(meta["count"], 3);
    assert_eq!(meta["next"], "http://localhost:3001/v1/event/?page=2&page_size=2");
    assert!(meta["previous"].is_null());
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 2);

    let (_, body) = t.get("/v1/event/?page=2&page_size=2", As::Anonymous).await;
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
    assert!(body["data"]["meta"]["next"].is_null());

    let (status, body) = t.get("/v1/event/?page=0", As::Anonymous).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["page"][0], "Invalid page.");
}

//! Smoke tests for the flows the mobile client hits first.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use reelvault::config::Config;
use reelvault::db::Store;
use reelvault::models::catalog::MovieInput;
use reelvault::state::SharedState;
use sea_orm::ConnectionTrait;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn test_config() -> Config {
    let db_path =
        std::env::temp_dir().join(format!("reelvault-smoke-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.server.secure_cookies = false;
    config.observability.metrics_enabled = false;
    config
}

async fn spawn_app() -> (Arc<SharedState>, Router) {
    let config = test_config();
    let store = Store::new(&config.general.database_path)
        .await
        .expect("failed to open store");
    let shared = Arc::new(SharedState::with_store(config, store));

    let state = reelvault::api::create_app_state(shared.clone(), None);
    (shared, reelvault::api::router(state))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::HOST, "api.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn film(title: &str, genre_ids: Vec<i32>) -> MovieInput {
    MovieInput {
        content_type: 1,
        title: title.to_string(),
        description: None,
        image: None,
        video: Some("https://archive.org/details/film".to_string()),
        genre_ids,
        age_rating: Some("PG".to_string()),
        language: Some("en".to_string()),
        is_subtitles: false,
        is_dubbed: false,
        status: 1,
    }
}

#[tokio::test]
async fn smoke_public_rails_on_empty_catalog() {
    let (_, app) = spawn_app().await;

    for uri in [
        "/api/listCardsTending",
        "/api/dramaListCard",
        "/api/moviesGenre",
        "/api/banner",
    ] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["success"], true, "{uri}");
        assert!(body["data"].as_array().unwrap().is_empty(), "{uri}");
    }

    let (status, body) = get_json(&app, "/api/moviesCards?page=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["current_page"], 3);
    assert_eq!(body["pagination"]["last_page"], 1);
    assert_eq!(body["pagination"]["from"], Value::Null);
}

#[tokio::test]
async fn smoke_form_encoded_login() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin&password=password"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["data"]["username"], "admin");
    assert_eq!(body["data"]["token"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn smoke_unknown_token_is_rejected() {
    let (_, app) = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/myListCards")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn smoke_drama_rail_follows_genre_name() {
    let (shared, app) = spawn_app().await;

    let drama = shared.store.create_genre("Drama").await.unwrap();
    let comedy = shared.store.create_genre("Comedy").await.unwrap();
    let sad = shared
        .store
        .create_movie(&film("Sad Story", vec![comedy.id, drama.id]), None)
        .await
        .unwrap();
    shared
        .store
        .create_movie(&film("Funny Story", vec![comedy.id]), None)
        .await
        .unwrap();

    let (status, body) = get_json(&app, "/api/dramaListCard").await;
    assert_eq!(status, StatusCode::OK);
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], sad.id);
    assert_eq!(cards[0]["image"], Value::Null);

    // Detail pages normalize archive.org links to their embed form
    let (_, body) = get_json(&app, &format!("/api/moviesDetail?id={}", sad.id)).await;
    assert_eq!(body["data"]["video"], "https://archive.org/embed/film");
    assert_eq!(body["data"]["genre"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn smoke_inactive_items_are_hidden() {
    let (shared, app) = spawn_app().await;

    let genre = shared.store.create_genre("Thriller").await.unwrap();
    let mut hidden = film("Hidden", vec![genre.id]);
    hidden.status = 0;
    let hidden = shared.store.create_movie(&hidden, None).await.unwrap();

    let (status, _) = get_json(&app, &format!("/api/moviesDetail?id={}", hidden.id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = get_json(&app, "/api/searchAll?title=Hidden").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn smoke_metrics_without_recorder() {
    let (_, app) = spawn_app().await;

    let login = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"admin","password":"password"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    let body = login.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/metrics")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        String::from_utf8_lossy(&text),
        "Metrics not enabled or failed to initialize"
    );
}

#[tokio::test]
async fn smoke_page_past_u64_range_is_empty() {
    let (shared, app) = spawn_app().await;

    let genre = shared.store.create_genre("Action").await.unwrap();
    shared
        .store
        .create_movie(&film("Heat", vec![genre.id]), None)
        .await
        .unwrap();

    let huge = u64::MAX;
    for uri in [
        format!("/api/moviesCards?page={huge}"),
        format!("/api/seriesCards?page={huge}"),
        format!("/api/searchAll?title=Heat&page={huge}"),
    ] {
        let (status, body) = get_json(&app, &uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body["data"].as_array().unwrap().is_empty(), "{uri}");
        assert_eq!(body["pagination"]["current_page"], huge, "{uri}");
        assert_eq!(body["pagination"]["from"], Value::Null, "{uri}");
    }

    let (_, body) = get_json(&app, "/api/moviesCards?page=1").await;
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

async fn backdate(shared: &SharedState, filter: &str) {
    shared
        .store
        .conn
        .execute_unprepared(&format!(
            "UPDATE movies SET updated_at = '2001-01-01T00:00:00Z' WHERE {filter}"
        ))
        .await
        .unwrap();
}

fn ids(body: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn smoke_trending_falls_back_to_all_active_items() {
    let (shared, app) = spawn_app().await;

    let genre = shared.store.create_genre("Action").await.unwrap();
    let old = shared
        .store
        .create_movie(&film("Old Hit", vec![genre.id]), None)
        .await
        .unwrap();
    let fresh = shared
        .store
        .create_movie(&film("Fresh Hit", vec![genre.id]), None)
        .await
        .unwrap();

    // Only items touched inside the window are trending
    backdate(&shared, &format!("id = {}", old.id)).await;
    let (status, body) = get_json(&app, "/api/listCardsTrending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![i64::from(fresh.id)]);

    // With nothing recent, every active item is returned
    backdate(&shared, "1 = 1").await;
    let (status, body) = get_json(&app, "/api/listCardsTrending").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![i64::from(old.id), i64::from(fresh.id)]);
}

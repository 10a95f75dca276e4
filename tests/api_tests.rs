use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use reelvault::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

const BASE: &str = "http://cdn.test";

async fn spawn_app() -> Router {
    let path = std::env::temp_dir().join(format!("reelvault-api-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", path.display());
    config.server.secure_cookies = false;
    config.server.public_base_url = Some(BASE.to_string());
    config.observability.metrics_enabled = false;

    let state = reelvault::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    reelvault::api::router(state)
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn register(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create(app: &Router, token: &str, uri: &str, body: Value) -> i64 {
    let (status, response) = call(app, "POST", uri, Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{uri} failed: {response}");
    response["data"]["id"].as_i64().unwrap()
}

/// Seeds one genre, a poster, a film and a series with one episode.
struct Seeded {
    genre: i64,
    poster: i64,
    film: i64,
    series: i64,
    season: i64,
}

async fn seed_catalog(app: &Router, admin: &str) -> Seeded {
    let genre = create(app, admin, "/api/admin/genres", json!({"name": "Action"})).await;
    let poster = create(
        app,
        admin,
        "/api/admin/attachments",
        json!({"name": "poster", "extension": "jpg", "path": "movies/"}),
    )
    .await;

    let film = create(
        app,
        admin,
        "/api/admin/movies",
        json!({
            "type": 1,
            "title": "Batman",
            "description": "Gotham at night",
            "image": poster,
            "video": "https://www.youtube.com/watch?v=abc123",
            "genre_id": [genre],
            "age_rating": "13+",
            "language": "en",
            "is_subtitles": true
        }),
    )
    .await;

    let series = create(
        app,
        admin,
        "/api/admin/movies",
        json!({
            "type": 2,
            "title": "Batman Beyond",
            "image": poster,
            "video": "https://example.com/ignored.mp4",
            "genre_id": [genre],
            "age_rating": "7+",
            "language": "en"
        }),
    )
    .await;

    let season = create(
        app,
        admin,
        "/api/admin/seasons",
        json!({"title": "Season 1", "number_of_season": 1, "movie_id": series}),
    )
    .await;

    create(
        app,
        admin,
        "/api/admin/episodes",
        json!({
            "title": "Rebirth",
            "season_id": season,
            "video": "https://cdn.example.com/ep1.m3u8",
            "image": poster,
            "duration": "22:00"
        }),
    )
    .await;

    Seeded {
        genre,
        poster,
        film,
        series,
        season,
    }
}

#[tokio::test]
async fn test_account_flow() {
    let app = spawn_app().await;

    let token = register(&app, "moviefan", "secret1").await;

    let (status, body) = call(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile retrieved successfully");
    assert_eq!(body["data"]["username"], "moviefan");
    assert_eq!(body["data"]["name"], "moviefan");
    assert_eq!(body["data"]["is_admin"], 0);

    let (status, body) = call(
        &app,
        "POST",
        "/api/updateProfile",
        Some(&token),
        Some(json!({"name": "Movie Fan"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Movie Fan");

    let (status, body) = call(
        &app,
        "POST",
        "/api/userPassword",
        Some(&token),
        Some(json!({"old_password": "wrong!!", "new_password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Old password is incorrect");

    let (status, _) = call(
        &app,
        "POST",
        "/api/userPassword",
        Some(&token),
        Some(json!({"old_password": "secret1", "new_password": "secret2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let fresh = login(&app, "moviefan", "secret2").await;

    let (status, body) = call(&app, "POST", "/api/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");

    // Only the presented token is revoked
    let (status, _) = call(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = call(&app, "GET", "/api/profile", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures() {
    let app = spawn_app().await;
    register(&app, "someone", "secret1").await;

    let (status, body) = call(&app, "POST", "/api/login", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());

    let (status, body) = call(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "nobody", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Username not found.");

    let (status, body) = call(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "someone", "password": "nope123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid password.");
}

#[tokio::test]
async fn test_registration_validation() {
    let app = spawn_app().await;
    register(&app, "taken", "secret1").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "ab", "password": "123"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["password"].is_array());

    let (status, body) = call(
        &app,
        "POST",
        "/api/register",
        None,
        Some(json!({"username": "taken", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["errors"]["username"][0],
        "The username has already been taken."
    );
}

#[tokio::test]
async fn test_banned_user_is_refused() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let user_token = register(&app, "troll", "secret1").await;

    let (_, users) = call(&app, "GET", "/api/admin/users?username=troll", Some(&admin), None).await;
    let id = users["data"][0]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/admin/users/{id}/flags"),
        Some(&admin),
        Some(json!({"is_ban": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_ban"], true);

    let (status, body) = call(
        &app,
        "POST",
        "/api/login",
        None,
        Some(json!({"username": "troll", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Your account has been banned.");

    let (status, _) = call(&app, "GET", "/api/profile", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = spawn_app().await;

    let (status, _) = call(&app, "GET", "/api/admin/dashboard", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = register(&app, "regular", "secret1").await;
    let (status, body) = call(&app, "GET", "/api/admin/dashboard", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Administrator access required");

    let admin = login(&app, "admin", "password").await;
    let (status, body) = call(&app, "GET", "/api/admin/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["uptime_seconds"].is_u64());
    assert_eq!(body["data"]["total_movies"], 0);
}

#[tokio::test]
async fn test_admin_session_login() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"username": "admin", "password": "password"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["message"], "Logout successful");

    // The flushed session no longer grants admin access
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/admin/dashboard")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_content_is_read_back_by_catalog() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/moviesDetail?id={}", seeded.film),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let detail = &body["data"];
    assert_eq!(detail["title"], "Batman");
    assert_eq!(detail["description"], "Gotham at night");
    assert_eq!(detail["image"], format!("{BASE}/storage/movies/poster.jpg"));
    assert_eq!(detail["video"], "https://www.youtube.com/embed/abc123");
    assert_eq!(detail["video_type"], "youtube");
    assert_eq!(detail["genre"], json!(["Action"]));
    assert_eq!(detail["is_sub"], true);
    assert_eq!(detail["is_dub"], false);

    // Ids are also accepted from a JSON body
    let (status, body) = call(
        &app,
        "POST",
        "/api/seriesDetail",
        None,
        Some(json!({"id": seeded.series})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let seasons = body["data"]["seasons"].as_array().unwrap();
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0]["id"], seeded.season);
    let episode = &seasons[0]["episodes"][0];
    assert_eq!(episode["title"], "Rebirth");
    assert_eq!(episode["video_type"], "direct");
    assert_eq!(episode["duration"], "22:00");

    // Series never keep a video
    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/admin/movies/{}", seeded.series),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["data"]["video"], Value::Null);
    assert_eq!(body["data"]["genre_id"], json!([seeded.genre]));

    let (status, body) = call(&app, "GET", "/api/moviesCards", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], seeded.film);
    assert_eq!(body["pagination"]["total"], 1);

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/seriesCards?genre_id={}", seeded.genre),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"][0]["id"], seeded.series);

    let (_, body) = call(&app, "GET", "/api/moviesGenre", None, None).await;
    assert_eq!(body["data"][0]["name"], "Action");

    let (_, body) = call(&app, "GET", "/api/listCardsTrending", None, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = call(
        &app,
        "POST",
        "/api/admin/banners",
        Some(&admin),
        Some(json!({"movie_id": seeded.film, "position": 1, "image": seeded.poster})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let (_, body) = call(&app, "GET", "/api/banner", None, None).await;
    assert_eq!(body["data"][0]["movie"]["title"], "Batman");
    assert_eq!(body["data"][0]["movie"]["type"], 1);
}

#[tokio::test]
async fn test_detail_errors() {
    let app = spawn_app().await;

    let (status, body) = call(&app, "GET", "/api/moviesDetail", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Movie ID is required");

    let (status, body) = call(&app, "GET", "/api/seriesDetail?id=999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Series not found");
}

#[tokio::test]
async fn test_movie_validation() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;

    let (status, body) = call(
        &app,
        "POST",
        "/api/admin/movies",
        Some(&admin),
        Some(json!({"type": 1, "title": " ", "genre_id": [42]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = &body["errors"];
    assert!(errors["title"].is_array());
    assert!(errors["genre_id"].is_array());
    assert!(errors["age_rating"].is_array());
    assert!(errors["image"].is_array());
    assert!(errors["video"].is_array());
}

#[tokio::test]
async fn test_suggestions() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    let other = create(
        &app,
        &admin,
        "/api/admin/movies",
        json!({
            "type": 1,
            "title": "Heat",
            "image": seeded.poster,
            "video": "https://example.com/heat.mp4",
            "genre_id": [seeded.genre],
            "age_rating": "16+",
            "language": "en"
        }),
    )
    .await;

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/moviesSuggest?id={}", seeded.film),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Suggested movies retrieved successfully");
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![other]);
}

#[tokio::test]
async fn test_list_and_favorites_are_idempotent() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;
    let user = register(&app, "collector", "secret1").await;
    let body = json!({"movie_id": seeded.film});

    let (status, response) = call(&app, "POST", "/api/addMovieList", Some(&user), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Movie added to list successfully");

    let (status, response) = call(&app, "POST", "/api/addMovieList", Some(&user), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Movie already in your list");
    assert_eq!(response["data"]["changed"], false);

    let (_, response) = call(
        &app,
        "GET",
        &format!("/api/checkList?movie_id={}", seeded.film),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(response["data"], 1);

    let (_, response) = call(&app, "GET", "/api/myListCards", Some(&user), None).await;
    assert_eq!(response["data"][0]["id"], seeded.film);

    let (_, response) = call(&app, "POST", "/api/removeMovieList", Some(&user), Some(body.clone())).await;
    assert_eq!(response["message"], "Movie removed from list successfully");
    let (status, response) = call(&app, "POST", "/api/removeMovieList", Some(&user), Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Movie not found in your list");

    let (_, response) = call(&app, "POST", "/api/addMovieFav", Some(&user), Some(body.clone())).await;
    assert_eq!(response["message"], "Movie added to favorites successfully");
    let (_, response) = call(&app, "POST", "/api/checkFav", Some(&user), Some(body)).await;
    assert_eq!(response["data"], 1);

    // The favorite film shares its genre with the series
    let (_, response) = call(&app, "GET", "/api/mayLike", Some(&user), None).await;
    assert_eq!(response["message"], "Recommendations retrieved successfully");
    assert_eq!(response["data"][0]["id"], seeded.series);

    let (status, response) = call(
        &app,
        "POST",
        "/api/addMovieList",
        Some(&user),
        Some(json!({"movie_id": 9999})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["errors"]["movie_id"][0], "The selected movie id is invalid.");

    let (status, response) = call(
        &app,
        "POST",
        "/api/addMovieFav",
        Some(&user),
        Some(json!({"movie_id": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["errors"]["movie_id"][0], "The movie id must be an integer.");
}

#[tokio::test]
async fn test_search_filters_by_ratio() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    // "Bat" is 50% of "Batman" but under 40% of "Batman Beyond"
    let (status, body) = call(&app, "GET", "/api/searchAll?title=Bat", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Search results retrieved successfully");
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![seeded.film]);

    let (_, body) = call(&app, "GET", "/api/searchAll?q=B", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (_, body) = call(&app, "GET", "/api/searchSeries?q=Batman%20Bey", None, None).await;
    assert_eq!(body["data"][0]["id"], seeded.series);

    let (_, body) = call(&app, "GET", "/api/searchMovies?q=Batman%20Bey", None, None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_view_increments() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    for expected in 1..=3 {
        let (status, body) = call(
            &app,
            "POST",
            "/api/view",
            None,
            Some(json!({"id": seeded.film})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "View incremented");
        assert_eq!(body["data"]["view"], expected);
    }

    let (status, body) = call(&app, "POST", "/api/view", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "ID is required");

    let (status, _) = call(&app, "POST", "/api/view?id=4242", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_movie_cascades() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/api/admin/movies/{}", seeded.series),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(
        &app,
        "GET",
        &format!("/api/admin/seasons/{}/episodes", seeded.season),
        Some(&admin),
        None,
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, body) = call(
        &app,
        "DELETE",
        &format!("/api/admin/movies/{}", seeded.series),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Movie not found");
}

#[tokio::test]
async fn test_admin_cannot_delete_itself() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;

    let (_, users) = call(&app, "GET", "/api/admin/users?username=admin", Some(&admin), None).await;
    let id = users["data"][0]["id"].as_i64().unwrap();

    let (status, body) = call(
        &app,
        "DELETE",
        &format!("/api/admin/users/{id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You cannot delete your own account");
}

#[tokio::test]
async fn test_admin_lists_past_last_page() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    seed_catalog(&app, &admin).await;

    let huge = u64::MAX;
    for uri in [
        format!("/api/admin/movies?page={huge}"),
        format!("/api/admin/users?page={huge}"),
    ] {
        let (status, body) = call(&app, "GET", &uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {body}");
        assert!(body["data"].as_array().unwrap().is_empty(), "{uri}");
        assert!(body["pagination"]["total"].as_u64().unwrap() > 0, "{uri}");
    }
}

#[tokio::test]
async fn test_series_detail_orders_seasons_and_episodes() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    let series = create(
        &app,
        &admin,
        "/api/admin/movies",
        json!({
            "type": 2,
            "title": "Gotham Nights",
            "image": seeded.poster,
            "genre_id": [seeded.genre],
            "age_rating": "13+",
            "language": "en"
        }),
    )
    .await;

    // Season 2 is created first so insertion order differs from numbering
    let second = create(
        &app,
        &admin,
        "/api/admin/seasons",
        json!({"title": "Season 2", "number_of_season": 2, "movie_id": series}),
    )
    .await;
    let first = create(
        &app,
        &admin,
        "/api/admin/seasons",
        json!({"title": "Season 1", "number_of_season": 1, "movie_id": series}),
    )
    .await;

    for (season, title) in [
        (second, "S2E1"),
        (first, "S1E1"),
        (second, "S2E2"),
        (first, "S1E2"),
        (first, "S1E3"),
    ] {
        create(
            &app,
            &admin,
            "/api/admin/episodes",
            json!({"title": title, "season_id": season}),
        )
        .await;
    }

    let (status, body) = call(
        &app,
        "GET",
        &format!("/api/seriesDetail?id={series}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let seasons = body["data"]["seasons"].as_array().unwrap();
    let numbers: Vec<i64> = seasons
        .iter()
        .map(|s| s["number_of_season"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2]);

    let titles = |season: &Value| -> Vec<String> {
        season["episodes"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(titles(&seasons[0]), vec!["S1E1", "S1E2", "S1E3"]);
    assert_eq!(titles(&seasons[1]), vec!["S2E1", "S2E2"]);
}

#[tokio::test]
async fn test_banners_carry_their_movies() {
    let app = spawn_app().await;
    let admin = login(&app, "admin", "password").await;
    let seeded = seed_catalog(&app, &admin).await;

    for (position, movie) in [(1, seeded.film), (2, seeded.series), (3, seeded.film)] {
        create(
            &app,
            &admin,
            "/api/admin/banners",
            json!({"movie_id": movie, "position": position}),
        )
        .await;
    }

    let (status, body) = call(&app, "GET", "/api/banner", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["movie"]["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Batman", "Batman Beyond", "Batman"]);
}

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use reelist::config::Config;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps all statements on the same
    // in-memory database.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;

    let state = reelist::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    reelist::api::router(state).await
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            builder
                .body(Body::from(serde_json::to_string(&json).unwrap()))
                .unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_root_and_health() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "reelist");
    assert_eq!(body["endpoints"]["favorites"], "/api/favorites");

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_users_crud() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "Ana", "email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["success"].as_bool().unwrap());
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["email"], "ana@example.com");

    // Duplicate email is rejected.
    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "Other", "email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body["success"].as_bool().unwrap());

    let (status, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{id}"),
        Some(serde_json::json!({"name": "Ana Maria"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ana Maria");
    assert_eq!(body["data"]["email"], "ana@example.com");

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_email_update_uniqueness() {
    let app = spawn_app().await;

    let (_, first) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "Ana", "email": "ana@example.com"})),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "Ben", "email": "ben@example.com"})),
    )
    .await;
    let ben_id = second["data"]["id"].as_i64().unwrap();

    // Taking over another user's email is a conflict.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{ben_id}"),
        Some(serde_json::json!({"email": "ana@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Re-submitting your own email is fine.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{ben_id}"),
        Some(serde_json::json!({"email": "ben@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let ana_id = first["data"]["id"].as_i64().unwrap();
    let (status, body) = send(&app, "GET", &format!("/api/users/{ana_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ana@example.com");
}

#[tokio::test]
async fn test_user_validation() {
    let app = spawn_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "", "email": "ok@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/api/users",
        Some(serde_json::json!({"name": "Ana", "email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

fn movie_payload(title: &str, year: i32) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "director": "Jane Doe",
        "genre": "Drama",
        "runtime_minutes": 110,
        "year": year,
        "rating": "PG-13",
        "synopsis": "A test movie."
    })
}

#[tokio::test]
async fn test_movies_crud() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "POST", "/api/movies", Some(movie_payload("Inception", 2010))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["title"], "Inception");
    assert_eq!(body["data"]["year"], 2010);

    // Same title and year is a conflict.
    let (status, _) = send(&app, "POST", "/api/movies", Some(movie_payload("Inception", 2010))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Same title, different year is fine.
    let (status, _) = send(&app, "POST", "/api/movies", Some(movie_payload("Inception", 2011))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/movies/{id}"),
        Some(serde_json::json!({"runtime_minutes": 148, "genre": "Sci-Fi, Thriller"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["runtime_minutes"], 148);
    assert_eq!(body["data"]["genre"], "Sci-Fi, Thriller");
    assert_eq!(body["data"]["title"], "Inception");

    let (status, _) = send(&app, "DELETE", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/movies/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movie_validation() {
    let app = spawn_app().await;

    let mut payload = movie_payload("Bad Runtime", 2000);
    payload["runtime_minutes"] = serde_json::json!(0);
    let (status, _) = send(&app, "POST", "/api/movies", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/movies", Some(movie_payload("Too Old", 1800))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/movies", Some(movie_payload("Too New", 2101))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/api/movies", Some(movie_payload("", 2000))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Invalid fields on update are rejected too.
    let (_, body) = send(&app, "POST", "/api/movies", Some(movie_payload("Fine", 2000))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/movies/{id}"),
        Some(serde_json::json!({"year": 1500})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_search() {
    let app = spawn_app().await;

    for (title, director, genre, year) in [
        ("The Matrix", "Wachowski", "Sci-Fi, Action", 1999),
        ("The Matrix Reloaded", "Wachowski", "Sci-Fi, Action", 2003),
        ("Amelie", "Jeunet", "Romance, Comedy", 2001),
    ] {
        let mut payload = movie_payload(title, year);
        payload["director"] = serde_json::json!(director);
        payload["genre"] = serde_json::json!(genre);
        let (status, _) = send(&app, "POST", "/api/movies", Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/movies/search?title=Matrix", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = send(&app, "GET", "/api/movies/search?director=Jeunet", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Amelie");

    let (_, body) = send(&app, "GET", "/api/movies/search?genre=Sci-Fi&year_min=2000", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "The Matrix Reloaded");

    let (_, body) = send(&app, "GET", "/api/movies/search?year=1999", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(
        &app,
        "GET",
        "/api/movies/search?year_min=1999&year_max=2001",
        None,
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_movies_by_rating_and_recent() {
    let app = spawn_app().await;

    let mut payload = movie_payload("Family Fun", 2015);
    payload["rating"] = serde_json::json!("G");
    send(&app, "POST", "/api/movies", Some(payload)).await;
    send(&app, "POST", "/api/movies", Some(movie_payload("Teen Pick", 2020))).await;

    let (status, body) = send(&app, "GET", "/api/movies/rating/g", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Family Fun");

    let (status, _) = send(&app, "GET", "/api/movies/rating/TV-MA", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/movies/recent?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let recent = body["data"].as_array().unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0]["title"], "Teen Pick");

    let (status, _) = send(&app, "GET", "/api/movies/recent?limit=51", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pagination_limits() {
    let app = spawn_app().await;

    for i in 0..5 {
        let (status, _) = send(
            &app,
            "POST",
            "/api/users",
            Some(serde_json::json!({
                "name": format!("User {i}"),
                "email": format!("user{i}@example.com")
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/api/users?skip=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "User 2");

    let (status, _) = send(&app, "GET", "/api/users?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/users?limit=5000", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    Router,
};
use serde_json::Value;
use sqlx::{Pool, Postgres};
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Tests share one database; each holds this lock while it truncates,
/// seeds and runs.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub const ALICE: i64 = 1;
pub const BRUNO: i64 = 2;
pub const CARLA: i64 = 3;
pub const ADMIN: i64 = 99;

/// Build the REST router over a freshly truncated and seeded database.
///
/// Returns `None` when neither `TEST_DATABASE_URL` nor `DATABASE_URL` is
/// set, so the suite is a no-op on machines without Postgres. The guard
/// must be held for the whole test.
pub async fn test_app() -> Option<(Router, Pool<Postgres>, tokio::sync::MutexGuard<'static, ()>)> {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();

    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("skipping: TEST_DATABASE_URL or DATABASE_URL not set");
        return None;
    };

    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE project_holidays, project_members, projects, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    sqlx::query(
        "INSERT INTO users (id, username, display_name, email, role) VALUES
            (1, 'alice', 'Alice Rossi', 'alice@example.com', 'user'),
            (2, 'bruno', 'Bruno Bianchi', 'bruno@example.com', 'user'),
            (3, 'carla', 'Carla Verdi', 'carla@example.com', 'user'),
            (99, 'admin', 'Site Admin', 'admin@example.com', 'admin')",
    )
    .execute(&pool)
    .await
    .expect("Failed to seed users");

    let state = server::db::AppState { pool: pool.clone() };
    let router = server::rest::api_router()
        .layer(middleware::from_fn(server::auth::middleware::auth_middleware))
        .with_state(state);

    Some((router, pool, guard))
}

/// Bearer token for a seeded user.
pub fn token(user_id: i64) -> String {
    let (email, role) = match user_id {
        ALICE => ("alice@example.com", "user"),
        BRUNO => ("bruno@example.com", "user"),
        CARLA => ("carla@example.com", "user"),
        ADMIN => ("admin@example.com", "admin"),
        other => panic!("no seeded user with id {other}"),
    };
    server::auth::jwt::create_access_token(user_id, email, role).expect("Failed to sign token")
}

fn request(method: &str, uri: &str, user: Option<i64>, body: Option<&Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user {
        builder = builder.header("authorization", format!("Bearer {}", token(id)));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: &Router, uri: &str, user: Option<i64>) -> (StatusCode, Value) {
    send(app, request("GET", uri, user, None)).await
}

pub async fn post_json(app: &Router, uri: &str, user: i64, body: &Value) -> (StatusCode, Value) {
    send(app, request("POST", uri, Some(user), Some(body))).await
}

pub async fn put_json(app: &Router, uri: &str, user: i64, body: &Value) -> (StatusCode, Value) {
    send(app, request("PUT", uri, Some(user), Some(body))).await
}

pub async fn delete(app: &Router, uri: &str, user: i64) -> (StatusCode, Value) {
    send(app, request("DELETE", uri, Some(user), None)).await
}

/// Create a project as `user` and return its id.
pub async fn create_project(app: &Router, user: i64, name: &str) -> String {
    let (status, body) = post_json(app, "/api/projects", user, &serde_json::json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CREATED, "create {name}: {body}");
    body["id"].as_str().expect("project id").to_string()
}

/// Assign `role` to `user_id` on `project_id`, acting as `actor`.
pub async fn assign_role(
    app: &Router,
    actor: i64,
    project_id: &str,
    user_id: i64,
    role: &str,
) -> (StatusCode, Value) {
    put_json(
        app,
        &format!("/api/projects/{project_id}/members/{user_id}"),
        actor,
        &serde_json::json!({ "role": role }),
    )
    .await
}

/// Send a request through the router and return status + parsed JSON.
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

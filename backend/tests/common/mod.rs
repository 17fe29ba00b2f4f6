#![allow(dead_code)]
use std::net::SocketAddr;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHasher,
};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use wardbook_backend::{api, AppState};

const JWT_SECRET: &str = "test-secret-that-is-at-least-32-chars-long!!";
const JWT_EXPIRY_HOURS: u64 = 12;

/// Spin up a real Axum server on a random port, returning its address and
/// the database pool. Returns `None` (so the caller can skip) when
/// TEST_DATABASE_URL is unset — tests write and delete data and must not run
/// against a shared database by accident. All tests share the same test
/// database; isolation comes from unique emails/dates/patients per test and
/// cleanup afterwards.
pub async fn setup_test_app() -> Option<(SocketAddr, PgPool)> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set — skipping integration test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    // Run migrations to ensure schema is up-to-date
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiry_hours: JWT_EXPIRY_HOURS,
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Some((addr, pool))
}

/// Helper to generate a unique email for each test run.
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@test.local", prefix, &Uuid::new_v4().to_string()[..8])
}

/// Create a test user with Argon2-hashed password. Returns (user_id, plaintext_password).
pub async fn create_test_user(pool: &PgPool, role: &str, email: &str) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let password = "testpass123";
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    sqlx::query(
        "INSERT INTO app_users (id, email, display_name, password_hash, role, is_active) \
         VALUES ($1, $2, 'Test User', $3, $4::app_role, true)",
    )
    .bind(user_id)
    .bind(email)
    .bind(&hash)
    .bind(role)
    .execute(pool)
    .await
    .expect("Failed to create test user");

    (user_id, password.to_string())
}

/// Create an inactive test user. Returns (user_id, plaintext_password).
pub async fn create_inactive_user(pool: &PgPool, email: &str) -> (Uuid, String) {
    let user_id = Uuid::new_v4();
    let password = "testpass123";
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash password")
        .to_string();

    sqlx::query(
        "INSERT INTO app_users (id, email, display_name, password_hash, role, is_active) \
         VALUES ($1, $2, 'Inactive User', $3, 'staff'::app_role, false)",
    )
    .bind(user_id)
    .bind(email)
    .bind(&hash)
    .execute(pool)
    .await
    .expect("Failed to create inactive user");

    (user_id, password.to_string())
}

/// Create an active nurse for booking/on-call fixtures. Returns the nurse id.
pub async fn create_test_nurse(pool: &PgPool, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO nurse_staff (id, name, color_code, is_active) VALUES ($1, $2, '#2563eb', true)",
    )
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .expect("Failed to create test nurse");
    id
}

/// Log in via the HTTP API and return the JWT token.
pub async fn get_auth_token(addr: SocketAddr, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Login request failed");

    assert_eq!(resp.status(), 200, "Login should return 200");

    let body: serde_json::Value = resp.json().await.expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("Response should contain token")
        .to_string()
}

/// Create a JWT token that is already expired (exp in the past).
/// Uses the same secret as the test app.
pub fn create_expired_token(user_id: Uuid) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use wardbook_backend::auth::{Claims, Role};

    let now = time::OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        role: Role::Staff,
        exp: (now - time::Duration::hours(1)).unix_timestamp(), // expired 1 hour ago
        iat: (now - time::Duration::hours(2)).unix_timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to create expired token")
}

/// Build a reqwest client (reusable across requests in a test).
pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Clean up everything a test user created, then the user itself.
pub async fn cleanup_test_user(pool: &PgPool, user_id: Uuid) {
    let cleanup_queries = [
        "DELETE FROM nurse_bookings WHERE created_by = $1",
        "DELETE FROM nurse_oncall WHERE created_by = $1",
        "DELETE FROM app_users WHERE id = $1",
    ];
    for q in cleanup_queries {
        let _ = sqlx::query(q).bind(user_id).execute(pool).await;
    }
}

/// Remove a nurse created for a test fixture.
pub async fn cleanup_test_nurse(pool: &PgPool, nurse_id: Uuid) {
    let _ = sqlx::query("DELETE FROM nurse_staff WHERE id = $1")
        .bind(nurse_id)
        .execute(pool)
        .await;
}

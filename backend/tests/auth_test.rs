mod common;

#[tokio::test]
async fn login_valid_credentials_returns_token_and_profile() {
    let Some((addr, pool)) = common::setup_test_app().await else { return };
    let email = common::unique_email("auth-valid");
    let (user_id, password) = common::create_test_user(&pool, "admin", &email).await;

    let client = common::http_client();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["token"].is_string(), "Response should contain a token");
    assert_eq!(body["user"]["email"].as_str().unwrap(), email);
    assert_eq!(body["user"]["role"].as_str().unwrap(), "admin");
    assert!(body["user"]["is_active"].as_bool().unwrap());

    common::cleanup_test_user(&pool, user_id).await;
}

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let Some((addr, pool)) = common::setup_test_app().await else { return };
    let email = common::unique_email("auth-wrong-pw");
    let (user_id, _password) = common::create_test_user(&pool, "staff", &email).await;

    let client = common::http_client();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": "wrong-password",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    common::cleanup_test_user(&pool, user_id).await;
}

#[tokio::test]
async fn login_inactive_user_returns_401() {
    let Some((addr, pool)) = common::setup_test_app().await else { return };
    let email = common::unique_email("auth-inactive");
    let (user_id, password) = common::create_inactive_user(&pool, &email).await;

    let client = common::http_client();
    let resp = client
        .post(format!("http://{}/api/auth/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    common::cleanup_test_user(&pool, user_id).await;
}

#[tokio::test]
async fn me_returns_current_profile() {
    let Some((addr, pool)) = common::setup_test_app().await else { return };
    let email = common::unique_email("auth-me");
    let (user_id, password) = common::create_test_user(&pool, "coordinator", &email).await;
    let token = common::get_auth_token(addr, &email, &password).await;

    let client = common::http_client();
    let resp = client
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["email"].as_str().unwrap(), email);
    assert_eq!(body["role"].as_str().unwrap(), "coordinator");

    common::cleanup_test_user(&pool, user_id).await;
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let Some((addr, pool)) = common::setup_test_app().await else { return };
    let email = common::unique_email("auth-expired");
    let (user_id, _password) = common::create_test_user(&pool, "staff", &email).await;
    let token = common::create_expired_token(user_id);

    let client = common::http_client();
    let resp = client
        .get(format!("http://{}/api/auth/me", addr))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);

    common::cleanup_test_user(&pool, user_id).await;
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let Some((addr, _pool)) = common::setup_test_app().await else { return };

    let client = common::http_client();
    let resp = client
        .get(format!("http://{}/api/bookings", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"].as_bool(), Some(false));
}

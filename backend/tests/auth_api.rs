use axum::http::StatusCode;
use hrms_backend::{models::user::UserRole, services::bootstrap::ensure_admin};
use serde_json::json;

mod support;

use support::{config_from, TestApp, TEST_PASSWORD};

#[tokio::test]
async fn test_register_login_and_me_flow() {
    let app = TestApp::new();

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "Ana@Example.com", "password": "longenough", "name": "Ana"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert_eq!(body["user"]["role"], "employee");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["token"].as_str().is_some());

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "ana@example.com", "password": "longenough"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_short_passwords() {
    let app = TestApp::new();
    app.seed_user(UserRole::Employee, "taken@example.com").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "TAKEN@example.com", "password": "longenough", "name": "B"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"email": "new@example.com", "password": "short", "name": "C"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::new();
    app.seed_user(UserRole::Employee, "emp@example.com").await;

    let (status, wrong_password) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "emp@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": TEST_PASSWORD})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_email["message"]);
}

#[tokio::test]
async fn test_login_accepts_urlencoded_form() {
    let app = TestApp::new();
    app.seed_user(UserRole::Employee, "form@example.com").await;

    let (status, body) = app
        .send(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("content-type", "application/x-www-form-urlencoded")
                .body(axum::body::Body::from(format!(
                    "email=form%40example.com&password={}",
                    TEST_PASSWORD
                )))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "form@example.com");
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = TestApp::new();

    let (status, _) = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", "not-a-jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_deactivated_account_is_rejected() {
    let app = TestApp::new();
    let (_, admin_token) = app.seed_user(UserRole::Admin, "admin@example.com").await;
    let (user, token) = app.seed_user(UserRole::Employee, "leaver@example.com").await;

    let (status, _) = app
        .put(
            &format!("/api/users/{}", user.id),
            &admin_token,
            json!({"is_active": false}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let (_, token) = app.seed_user(UserRole::Employee, "pw@example.com").await;

    let (status, _) = app
        .put(
            "/api/auth/change-password",
            &token,
            json!({"current_password": "wrong-one", "new_password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            "/api/auth/change-password",
            &token,
            json!({"current_password": TEST_PASSWORD, "new_password": "brand-new-pass"}),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "pw@example.com", "password": "brand-new-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bootstrap_admin_is_created_once() {
    let app = TestApp::with_config(config_from(&[
        ("ADMIN_EMAIL", "Root@Example.com"),
        ("ADMIN_PASSWORD", "bootstrap-pass"),
    ]));

    let created = ensure_admin(&app.state).await.unwrap();
    assert_eq!(created.unwrap().email, "root@example.com");
    assert!(ensure_admin(&app.state).await.unwrap().is_none());

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "root@example.com", "password": "bootstrap-pass"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_users_admin_only() {
    let app = TestApp::new();
    let (admin, admin_token) = app.seed_user(UserRole::Admin, "admin@example.com").await;
    let (_, hr_token) = app.seed_user(UserRole::Hr, "hr@example.com").await;
    let (employee, _) = app.seed_user(UserRole::Employee, "emp@example.com").await;

    let (status, _) = app.get("/api/users", &hr_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/api/users?limit=2", &admin_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = app
        .put(
            &format!("/api/users/{}", employee.id),
            &admin_token,
            json!({"role": "hr"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "hr");

    let (status, _) = app
        .delete(&format!("/api/users/{}", admin.id), &admin_token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .delete(&format!("/api/users/{}", employee.id), &admin_token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/users/{}", employee.id), &admin_token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

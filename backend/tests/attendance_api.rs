use axum::http::StatusCode;
use hrms_backend::models::user::UserRole;
use serde_json::json;

mod support;

use support::TestApp;

#[tokio::test]
async fn test_check_in_and_out_for_own_record() {
    let app = TestApp::new();
    let (user, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;
    let employee = app.seed_employee("E-1", Some(&user), None, 3000.0).await;

    let (status, record) = app
        .request("POST", "/api/attendance/check-in", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["employee_id"], employee.id);
    assert!(matches!(record["status"].as_str(), Some("present" | "late")));
    assert!(record["check_out"].is_null());

    let (status, _) = app
        .post("/api/attendance/check-in", &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, today) = app.get("/api/attendance/today", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(today["id"], record["id"]);

    let (status, closed) = app
        .post("/api/attendance/check-out", &token, json!({"notes": "done"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(closed["work_hours"], 0.0);
    assert_eq!(closed["status"], "half_day");
    assert_eq!(closed["notes"], "done");

    let (status, body) = app
        .post("/api/attendance/check-out", &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Already checked out today");
}

#[tokio::test]
async fn test_check_out_without_check_in_is_bad_request() {
    let app = TestApp::new();
    let (user, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;
    app.seed_employee("E-1", Some(&user), None, 3000.0).await;

    let (status, _) = app
        .post("/api/attendance/check-out", &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_without_employee_record_cannot_check_in() {
    let app = TestApp::new();
    let (_, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;

    let (status, _) = app
        .post("/api/attendance/check-in", &token, json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/attendance", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_staff_checks_in_on_behalf_and_employees_are_scoped() {
    let app = TestApp::new();
    let (_, hr_token) = app.seed_user(UserRole::Hr, "hr@example.com").await;
    let (user, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;
    let own = app.seed_employee("E-1", Some(&user), None, 3000.0).await;
    let other = app.seed_employee("E-2", None, None, 3000.0).await;

    let (status, _) = app
        .post(
            "/api/attendance/check-in",
            &hr_token,
            json!({"employee_id": other.id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .post(
            "/api/attendance/check-in",
            &token,
            json!({"employee_id": other.id}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post("/api/attendance/check-in", &token, json!({})).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, all) = app.get("/api/attendance", &hr_token).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, mine) = app.get("/api/attendance", &token).await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["employee_id"], own.id);

    let (status, _) = app
        .get(&format!("/api/attendance?employee_id={}", other.id), &token)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, none) = app
        .get("/api/attendance?from=2000-01-01&to=2000-01-31", &hr_token)
        .await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn test_terminated_employee_cannot_check_in() {
    let app = TestApp::new();
    let (_, hr_token) = app.seed_user(UserRole::Hr, "hr@example.com").await;
    let employee = app.seed_employee("E-1", None, None, 3000.0).await;

    let (status, _) = app
        .put(
            &format!("/api/employees/{}", employee.id),
            &hr_token,
            json!({"status": "terminated"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/attendance/check-in",
            &hr_token,
            json!({"employee_id": employee.id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

use axum::http::StatusCode;
use hrms_backend::models::user::UserRole;
use serde_json::json;

mod support;

use support::TestApp;

#[tokio::test]
async fn test_exit_interview_lifecycle_terminates_employee() {
    let app = TestApp::new();
    let (_, hr_token) = app.seed_user(UserRole::Hr, "hr@example.com").await;
    let (user, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;
    let employee = app.seed_employee("E-1", Some(&user), None, 3000.0).await;

    let (status, _) = app
        .post(
            "/api/exit-interviews",
            &hr_token,
            json!({"employee_id": employee.id, "interview_date": "2024-10-01", "reason": "Relocation", "rating": 6}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/exit-interviews",
            &hr_token,
            json!({"employee_id": "missing", "interview_date": "2024-10-01", "reason": "Relocation"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, interview) = app
        .post(
            "/api/exit-interviews",
            &hr_token,
            json!({"employee_id": employee.id, "interview_date": "2024-10-01", "reason": "Relocation", "rating": 4}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(interview["status"], "scheduled");
    let id = interview["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/api/exit-interviews",
            &token,
            json!({"employee_id": employee.id, "interview_date": "2024-10-01", "reason": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, own) = app.get(&format!("/api/exit-interviews/{}", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["reason"], "Relocation");

    let (status, completed) = app
        .put(
            &format!("/api/exit-interviews/{}", id),
            &hr_token,
            json!({"status": "completed", "feedback": "Great team"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["status"], "completed");

    let (_, record) = app
        .get(&format!("/api/employees/{}", employee.id), &hr_token)
        .await;
    assert_eq!(record["status"], "terminated");

    let (status, _) = app
        .delete(&format!("/api/exit-interviews/{}", id), &hr_token)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = app.get("/api/exit-interviews", &hr_token).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_employees_only_see_their_own_interviews() {
    let app = TestApp::new();
    let (_, hr_token) = app.seed_user(UserRole::Hr, "hr@example.com").await;
    let (user, token) = app.seed_user(UserRole::Employee, "emp@example.com").await;
    app.seed_employee("E-1", Some(&user), None, 3000.0).await;
    let other = app.seed_employee("E-2", None, None, 3000.0).await;

    let (_, interview) = app
        .post(
            "/api/exit-interviews",
            &hr_token,
            json!({"employee_id": other.id, "interview_date": "2024-10-01", "reason": "Career change"}),
        )
        .await;

    let (_, mine) = app.get("/api/exit-interviews", &token).await;
    assert_eq!(mine, json!([]));
    let (status, _) = app
        .get(
            &format!("/api/exit-interviews/{}", interview["id"].as_str().unwrap()),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

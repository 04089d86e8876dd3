#![allow(dead_code)]
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use hrms_backend::{
    app::build_router,
    config::Config,
    db::MemoryDocumentStore,
    models::{
        department::Department,
        employee::{CreateEmployee, Employee},
        user::{User, UserRole},
    },
    state::AppState,
    utils::{jwt::create_access_token, password::hash_password},
};
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "password123";

/// Test configuration with `vars` taking precedence over the test defaults.
pub fn config_from(vars: &[(&str, &str)]) -> Config {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(move |key| {
        vars.iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
            .or_else(|| match key {
                "NODE_ENV" => Some("test".to_string()),
                "JWT_SECRET" => Some(TEST_JWT_SECRET.to_string()),
                "FRONTEND_DIST_DIR" => Some("/nonexistent/hrms-dist".to_string()),
                _ => None,
            })
    })
    .expect("test config")
}

pub fn test_config() -> Config {
    config_from(&[])
}

pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let state = AppState::new(Arc::new(MemoryDocumentStore::new()), config);
        let router = build_router(state.clone());
        Self { state, router }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, Some(token), None).await
    }

    /// Stores an active user with [`TEST_PASSWORD`] and returns it with a bearer token.
    pub async fn seed_user(&self, role: UserRole, email: &str) -> (User, String) {
        let user = User::new(
            email,
            format!("{} user", role.as_str()),
            hash_password(TEST_PASSWORD).unwrap(),
            role,
        );
        self.state.collection::<User>().insert(&user).await.unwrap();
        let token = create_test_token(&user);
        (user, token)
    }

    pub async fn seed_department(&self, name: &str) -> Department {
        let department = Department::new(name.to_string(), None, None);
        self.state
            .collection::<Department>()
            .insert(&department)
            .await
            .unwrap();
        department
    }

    pub async fn seed_employee(
        &self,
        code: &str,
        user: Option<&User>,
        department: Option<&Department>,
        base_salary: f64,
    ) -> Employee {
        let employee = Employee::from_create(CreateEmployee {
            user_id: user.map(|u| u.id.clone()),
            employee_code: code.to_string(),
            first_name: "Test".to_string(),
            last_name: code.to_string(),
            email: format!("{}@example.com", code.to_lowercase()),
            phone: None,
            department_id: department.map(|d| d.id.clone()),
            position: "Engineer".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            base_salary,
            status: None,
        });
        self.state
            .collection::<Employee>()
            .insert(&employee)
            .await
            .unwrap();
        employee
    }
}

pub fn create_test_token(user: &User) -> String {
    create_access_token(
        user.id.clone(),
        user.email.clone(),
        user.role.as_str().to_string(),
        TEST_JWT_SECRET,
        1,
    )
    .unwrap()
}

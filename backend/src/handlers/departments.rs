use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::Filter,
    error::AppError,
    extract::Payload,
    handlers::common::{not_found, require_staff},
    middleware,
    models::{
        department::{CreateDepartment, Department, DepartmentResponse, UpdateDepartment},
        employee::Employee,
        user::User,
    },
    state::AppState,
};

/// Any signed-in user may read departments; writes need HR or admin.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

async fn with_employee_count(
    state: &AppState,
    department: Department,
) -> Result<DepartmentResponse, AppError> {
    let employee_count = state
        .collection::<Employee>()
        .count(Filter::new().eq("department_id", department.id.as_str()))
        .await?;
    Ok(DepartmentResponse {
        department,
        employee_count,
    })
}

async fn load_department(state: &AppState, id: &str) -> Result<Department, AppError> {
    state
        .collection::<Department>()
        .get(id)
        .await?
        .ok_or_else(|| not_found("Department"))
}

async fn ensure_unique_name(
    state: &AppState,
    name: &str,
    except_id: Option<&str>,
) -> Result<(), AppError> {
    let taken = state
        .collection::<Department>()
        .all()
        .await?
        .iter()
        .any(|department| department.has_name(name) && Some(department.id.as_str()) != except_id);
    if taken {
        return Err(AppError::Conflict(format!(
            "Department '{}' already exists",
            name.trim()
        )));
    }
    Ok(())
}

/// Empty string clears the manager; anything else must be a known employee.
async fn resolve_manager(
    state: &AppState,
    manager_id: Option<String>,
) -> Result<Option<String>, AppError> {
    match manager_id.filter(|id| !id.is_empty()) {
        Some(id) => {
            if state.collection::<Employee>().get(&id).await?.is_none() {
                return Err(AppError::BadRequest("Unknown manager_id".to_string()));
            }
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, AppError> {
    let mut departments = state.collection::<Department>().all().await?;
    departments.sort_by_key(|department| department.name.to_lowercase());

    let mut response = Vec::with_capacity(departments.len());
    for department in departments {
        response.push(with_employee_count(&state, department).await?);
    }
    Ok(Json(response))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DepartmentResponse>, AppError> {
    let department = load_department(&state, &id).await?;
    Ok(Json(with_employee_count(&state, department).await?))
}

pub async fn create_department(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<CreateDepartment>,
) -> Result<(StatusCode, Json<DepartmentResponse>), AppError> {
    require_staff(&user)?;
    payload.validate()?;
    ensure_unique_name(&state, &payload.name, None).await?;
    let manager_id = resolve_manager(&state, payload.manager_id).await?;

    let department = Department::new(
        payload.name.trim().to_string(),
        payload.description,
        manager_id,
    );
    state.collection::<Department>().insert(&department).await?;
    tracing::info!(department_id = %department.id, "Department created");

    Ok((
        StatusCode::CREATED,
        Json(DepartmentResponse {
            department,
            employee_count: 0,
        }),
    ))
}

pub async fn update_department(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateDepartment>,
) -> Result<Json<DepartmentResponse>, AppError> {
    require_staff(&user)?;
    payload.validate()?;
    let mut department = load_department(&state, &id).await?;

    if let Some(name) = payload.name {
        ensure_unique_name(&state, &name, Some(&department.id)).await?;
        department.name = name.trim().to_string();
    }
    if let Some(description) = payload.description {
        department.description = Some(description).filter(|d| !d.is_empty());
    }
    if payload.manager_id.is_some() {
        department.manager_id = resolve_manager(&state, payload.manager_id).await?;
    }
    department.updated_at = Utc::now();

    state.collection::<Department>().replace(&department).await?;
    Ok(Json(with_employee_count(&state, department).await?))
}

pub async fn delete_department(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_staff(&user)?;
    let department = load_department(&state, &id).await?;

    let assigned = state
        .collection::<Employee>()
        .count(Filter::new().eq("department_id", department.id.as_str()))
        .await?;
    if assigned > 0 {
        return Err(AppError::Conflict(format!(
            "Department still has {} employee(s)",
            assigned
        )));
    }

    state.collection::<Department>().delete(&department.id).await?;
    tracing::info!(department_id = %department.id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}

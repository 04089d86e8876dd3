use axum::{
    extract::{Extension, Path, Query, State},
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
    handlers::common::{
        employee_scope, ensure_can_access, find_employee, linked_employee, not_found,
        require_staff, EmployeeScope,
    },
    middleware,
    models::{
        department::Department,
        employee::{CreateEmployee, Employee, EmployeeQuery, UpdateEmployee},
        user::User,
        PaginatedResponse,
    },
    state::AppState,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/me", get(my_employee))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route_layer(from_fn_with_state(state.clone(), middleware::auth))
}

async fn ensure_department_exists(state: &AppState, department_id: Option<&str>) -> Result<(), AppError> {
    if let Some(department_id) = department_id {
        if state.collection::<Department>().get(department_id).await?.is_none() {
            return Err(AppError::BadRequest("Unknown department_id".to_string()));
        }
    }
    Ok(())
}

/// A login account may back at most one employee record.
async fn ensure_user_linkable(
    state: &AppState,
    user_id: Option<&str>,
    except_employee: Option<&str>,
) -> Result<(), AppError> {
    let Some(user_id) = user_id else {
        return Ok(());
    };
    if state.collection::<User>().get(user_id).await?.is_none() {
        return Err(AppError::BadRequest("Unknown user_id".to_string()));
    }
    let linked = state
        .collection::<Employee>()
        .find_one(Filter::new().eq("user_id", user_id))
        .await?;
    match linked {
        Some(employee) if Some(employee.id.as_str()) != except_employee => Err(AppError::Conflict(
            "User is already linked to another employee".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<EmployeeQuery>,
) -> Result<Json<PaginatedResponse<Employee>>, AppError> {
    let pagination = query.pagination();
    let filter = Filter::new()
        .eq_opt("department_id", query.department_id.clone())
        .eq_opt("status", query.status.map(|status| status.as_str()));

    let mut employees = match employee_scope(&state, &user, None).await? {
        EmployeeScope::All => state.collection::<Employee>().find(filter).await?,
        EmployeeScope::Only(employee_id) => state
            .collection::<Employee>()
            .find(filter.eq("id", employee_id))
            .await?,
        EmployeeScope::Nobody => Vec::new(),
    };

    if let Some(search) = query.search.as_deref() {
        employees.retain(|employee| employee.matches_search(search));
    }
    employees.sort_by(|a, b| {
        (a.last_name.to_lowercase(), a.first_name.to_lowercase())
            .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
    });

    Ok(Json(pagination.paginate(employees)))
}

pub async fn my_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Employee>, AppError> {
    linked_employee(&state, &user)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Employee record"))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let employee = find_employee(&state, &id).await?;
    ensure_can_access(&state, &user, &employee.id).await?;
    Ok(Json(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Payload(payload): Payload<CreateEmployee>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    require_staff(&user)?;
    payload.validate()?;

    let employees = state.collection::<Employee>();
    let code = payload.employee_code.trim().to_string();
    if employees
        .find_one(Filter::new().eq("employee_code", code.as_str()))
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "Employee code '{}' is already in use",
            code
        )));
    }

    let employee = Employee::from_create(payload);
    ensure_department_exists(&state, employee.department_id.as_deref()).await?;
    ensure_user_linkable(&state, employee.user_id.as_deref(), None).await?;

    employees.insert(&employee).await?;
    tracing::info!(employee_id = %employee.id, code = %employee.employee_code, "Employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    Payload(payload): Payload<UpdateEmployee>,
) -> Result<Json<Employee>, AppError> {
    require_staff(&user)?;
    payload.validate()?;

    let mut employee = find_employee(&state, &id).await?;
    let previous_user = employee.user_id.clone();
    employee.apply_update(payload);

    ensure_department_exists(&state, employee.department_id.as_deref()).await?;
    if employee.user_id != previous_user {
        ensure_user_linkable(&state, employee.user_id.as_deref(), Some(&employee.id)).await?;
    }

    state.collection::<Employee>().replace(&employee).await?;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    require_staff(&user)?;
    if !state.collection::<Employee>().delete(&id).await? {
        return Err(not_found("Employee"));
    }

    let departments = state.collection::<Department>();
    for mut department in departments
        .find(Filter::new().eq("manager_id", id.as_str()))
        .await?
    {
        department.manager_id = None;
        department.updated_at = Utc::now();
        departments.replace(&department).await?;
    }

    tracing::info!(employee_id = %id, "Employee deleted");
    Ok(StatusCode::NO_CONTENT)
}

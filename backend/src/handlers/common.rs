//! Helpers shared by the domain routers: role checks and employee scoping.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    db::Filter,
    error::AppError,
    models::{employee::Employee, user::User},
    state::AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EmployeeParam {
    pub employee_id: Option<String>,
}

/// Which employees' records a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmployeeScope {
    All,
    Only(String),
    /// Non-staff caller without a linked employee record.
    Nobody,
}

impl EmployeeScope {
    /// Narrows `filter` to the scope, or `None` when nothing is visible.
    pub fn apply(&self, filter: Filter) -> Option<Filter> {
        match self {
            EmployeeScope::All => Some(filter),
            EmployeeScope::Only(employee_id) => Some(filter.eq("employee_id", employee_id.as_str())),
            EmployeeScope::Nobody => None,
        }
    }
}

pub fn require_staff(user: &User) -> Result<(), AppError> {
    if user.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden("HR or admin role required".to_string()))
    }
}

pub fn not_found(entity: &str) -> AppError {
    AppError::NotFound(format!("{} not found", entity))
}

pub async fn find_employee(state: &AppState, employee_id: &str) -> Result<Employee, AppError> {
    state
        .collection::<Employee>()
        .get(employee_id)
        .await?
        .ok_or_else(|| not_found("Employee"))
}

/// The employee record linked to the caller's account.
pub async fn linked_employee(state: &AppState, user: &User) -> Result<Option<Employee>, AppError> {
    Ok(state
        .collection::<Employee>()
        .find_one(Filter::new().eq("user_id", user.id.as_str()))
        .await?)
}

/// Employee an action applies to: any employee for staff, otherwise the caller's own.
pub async fn resolve_acting_employee(
    state: &AppState,
    user: &User,
    requested: Option<&str>,
) -> Result<Employee, AppError> {
    let requested = requested.filter(|id| !id.is_empty());

    if user.is_staff() {
        if let Some(employee_id) = requested {
            return find_employee(state, employee_id).await;
        }
    }

    let own = linked_employee(state, user).await?.ok_or_else(|| {
        if user.is_staff() {
            AppError::BadRequest("employee_id is required".to_string())
        } else {
            AppError::BadRequest("No employee record is linked to this account".to_string())
        }
    })?;

    match requested {
        Some(employee_id) if employee_id != own.id => Err(AppError::Forbidden(
            "Cannot act on behalf of another employee".to_string(),
        )),
        _ => Ok(own),
    }
}

/// Listing scope: staff may filter by any employee, others only see their own records.
pub async fn employee_scope(
    state: &AppState,
    user: &User,
    requested: Option<String>,
) -> Result<EmployeeScope, AppError> {
    let requested = requested.filter(|id| !id.is_empty());

    if user.is_staff() {
        return Ok(requested.map(EmployeeScope::Only).unwrap_or(EmployeeScope::All));
    }

    match linked_employee(state, user).await? {
        Some(own) => match requested {
            Some(employee_id) if employee_id != own.id => Err(AppError::Forbidden(
                "Cannot view another employee's records".to_string(),
            )),
            _ => Ok(EmployeeScope::Only(own.id)),
        },
        None => Ok(EmployeeScope::Nobody),
    }
}

/// Staff may access any employee's records; others only their own.
pub async fn ensure_can_access(
    state: &AppState,
    user: &User,
    employee_id: &str,
) -> Result<(), AppError> {
    if user.is_staff() {
        return Ok(());
    }
    match linked_employee(state, user).await? {
        Some(own) if own.id == employee_id => Ok(()),
        _ => Err(AppError::Forbidden("Access denied".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scope_narrows_filter() {
        let base = Filter::new().eq("status", "pending");
        assert_eq!(EmployeeScope::All.apply(base.clone()), Some(base.clone()));
        assert_eq!(
            EmployeeScope::Only("e1".into())
                .apply(base.clone())
                .map(|f| f.to_json()),
            Some(json!({"status": "pending", "employee_id": "e1"}))
        );
        assert_eq!(EmployeeScope::Nobody.apply(base), None);
    }
}

//! Employee records and the payloads used to manage them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::PaginationQuery;
use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: String,
    /// Login account linked to this employee, if any.
    pub user_id: Option<String>,
    pub employee_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department_id: Option<String>,
    pub position: String,
    pub hire_date: NaiveDate,
    /// Monthly base salary.
    pub base_salary: f64,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Employee {
    const COLLECTION: &'static str = "employees";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::OnLeave => "on_leave",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

impl Employee {
    pub fn from_create(payload: CreateEmployee) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            user_id: payload.user_id.filter(|id| !id.is_empty()),
            employee_code: payload.employee_code.trim().to_string(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email.trim().to_lowercase(),
            phone: payload.phone,
            department_id: payload.department_id.filter(|id| !id.is_empty()),
            position: payload.position,
            hire_date: payload.hire_date,
            base_salary: payload.base_salary,
            status: payload.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match on name, email, or employee code.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.full_name(),
            self.email.clone(),
            self.employee_code.clone(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Applies the provided fields. Empty `department_id` / `user_id` unassign.
    pub fn apply_update(&mut self, update: UpdateEmployee) {
        if let Some(user_id) = update.user_id {
            self.user_id = Some(user_id).filter(|id| !id.is_empty());
        }
        if let Some(first_name) = update.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_lowercase();
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone).filter(|p| !p.is_empty());
        }
        if let Some(department_id) = update.department_id {
            self.department_id = Some(department_id).filter(|id| !id.is_empty());
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(hire_date) = update.hire_date {
            self.hire_date = hire_date;
        }
        if let Some(base_salary) = update.base_salary {
            self.base_salary = base_salary;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub employee_code: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub department_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    pub hire_date: NaiveDate,
    #[validate(range(min = 0.0))]
    pub base_salary: f64,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub department_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    #[validate(range(min = 0.0))]
    pub base_salary: Option<f64>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EmployeeQuery {
    pub department_id: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EmployeeQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.limit, self.offset)
    }
}

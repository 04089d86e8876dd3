use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Department {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Employee heading the department.
    pub manager_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Department {
    const COLLECTION: &'static str = "departments";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Department {
    pub fn new(name: String, description: Option<String>, manager_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            name,
            description,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub manager_id: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DepartmentResponse {
    #[serde(flatten)]
    pub department: Department,
    pub employee_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_comparison_ignores_case_and_whitespace() {
        let department = Department::new("Engineering".into(), None, None);
        assert!(department.has_name(" engineering "));
        assert!(!department.has_name("Finance"));
    }

    #[test]
    fn response_flattens_department_fields() {
        let department = Department::new("Finance".into(), Some("Money".into()), None);
        let json = serde_json::to_value(DepartmentResponse {
            department,
            employee_count: 3,
        })
        .unwrap();
        assert_eq!(json["name"], "Finance");
        assert_eq!(json["employee_count"], 3);
    }
}

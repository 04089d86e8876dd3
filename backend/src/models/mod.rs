//! Data models shared across storage and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub mod attendance;
pub mod department;
pub mod employee;
pub mod exit_interview;
pub mod leave;
pub mod notification;
pub mod payroll;
pub mod user;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Generates a new document id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PaginationQuery {
    /// Maximum number of records to return (default: 50, max: 500).
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of records to skip (default: 0).
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

impl PaginationQuery {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Returns a clamped limit value (1..=500).
    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_PAGE_LIMIT)
    }

    /// Returns offset, floored at 0.
    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// Slices an already filtered list into the requested page.
    pub fn paginate<T: Serialize>(&self, items: Vec<T>) -> PaginatedResponse<T> {
        let total = items.len() as i64;
        let limit = self.limit();
        let offset = self.offset();
        let data = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        PaginatedResponse::new(data, total, limit, offset)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Wrapper for paginated API responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            data,
            total,
            limit,
            offset,
        }
    }
}

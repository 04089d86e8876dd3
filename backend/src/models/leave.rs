use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::Document;
use crate::utils::time::inclusive_days;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive calendar days covered by the request.
    pub days: i64,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for LeaveRequest {
    const COLLECTION: &'static str = "leaves";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Unpaid,
    Other,
}

impl LeaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Personal => "personal",
            LeaveType::Unpaid => "unpaid",
            LeaveType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// Pending and approved requests block overlapping requests.
    pub fn is_active(&self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

impl LeaveRequest {
    pub fn new(
        employee_id: String,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            employee_id,
            leave_type,
            start_date,
            end_date,
            days: inclusive_days(start_date, end_date),
            reason,
            status: LeaveStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_comment: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    pub fn review(&mut self, status: LeaveStatus, reviewer_id: &str, comment: Option<String>) {
        let now = Utc::now();
        self.status = status;
        self.reviewed_by = Some(reviewer_id.to_string());
        self.reviewed_at = Some(now);
        self.review_comment = comment;
        self.updated_at = now;
    }
}

pub fn is_valid_leave_window(start: NaiveDate, end: NaiveDate) -> bool {
    start <= end
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLeaveRequest {
    /// Staff may file on behalf of an employee.
    pub employee_id: Option<String>,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReviewLeaveRequest {
    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LeaveQuery {
    pub employee_id: Option<String>,
    pub status: Option<LeaveStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, day).unwrap()
    }

    #[test]
    fn new_request_counts_inclusive_days() {
        let leave = LeaveRequest::new("e1".into(), LeaveType::Annual, d(1), d(5), None);
        assert_eq!(leave.days, 5);
        assert_eq!(leave.status, LeaveStatus::Pending);
    }

    #[test]
    fn overlap_detection() {
        let leave = LeaveRequest::new("e1".into(), LeaveType::Sick, d(10), d(12), None);
        assert!(leave.overlaps(d(12), d(14)));
        assert!(leave.overlaps(d(8), d(10)));
        assert!(leave.overlaps(d(11), d(11)));
        assert!(!leave.overlaps(d(13), d(15)));
        assert!(!leave.overlaps(d(1), d(9)));
    }

    #[test]
    fn review_records_reviewer() {
        let mut leave = LeaveRequest::new("e1".into(), LeaveType::Personal, d(1), d(1), None);
        leave.review(LeaveStatus::Rejected, "hr-1", Some("Busy week".into()));
        assert_eq!(leave.status, LeaveStatus::Rejected);
        assert_eq!(leave.reviewed_by.as_deref(), Some("hr-1"));
        assert!(leave.reviewed_at.is_some());
        assert!(!leave.status.is_active());
    }

    #[test]
    fn window_validation() {
        assert!(is_valid_leave_window(d(1), d(1)));
        assert!(!is_valid_leave_window(d(2), d(1)));
    }
}

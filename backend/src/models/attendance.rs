use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::Document;
use crate::utils::time::round2;

/// Minutes after the workday start before a check-in counts as late.
pub const LATE_GRACE_MINUTES: i64 = 15;
/// Worked hours below which a day is recorded as a half day.
pub const HALF_DAY_HOURS: f64 = 4.0;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: String,
    pub employee_id: String,
    /// Local calendar day the record belongs to.
    pub date: NaiveDate,
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub work_hours: Option<f64>,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for AttendanceRecord {
    const COLLECTION: &'static str = "attendance";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    HalfDay,
}

impl AttendanceRecord {
    pub fn check_in(
        employee_id: String,
        date: NaiveDate,
        local_time: NaiveTime,
        workday_start: NaiveTime,
        now: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        let status = if is_late(local_time, workday_start) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::Present
        };
        Self {
            id: super::new_id(),
            employee_id,
            date,
            check_in: now,
            check_out: None,
            work_hours: None,
            status,
            notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.check_out.is_none()
    }

    /// Closes the record, computing worked hours and the half-day flag.
    pub fn check_out(&mut self, now: DateTime<Utc>) {
        let minutes = (now - self.check_in).num_minutes().max(0);
        let hours = round2(minutes as f64 / 60.0);
        self.check_out = Some(now);
        self.work_hours = Some(hours);
        if hours < HALF_DAY_HOURS {
            self.status = AttendanceStatus::HalfDay;
        }
        self.updated_at = now;
    }
}

pub fn is_late(local_time: NaiveTime, workday_start: NaiveTime) -> bool {
    let (deadline, _) =
        workday_start.overflowing_add_signed(chrono::Duration::minutes(LATE_GRACE_MINUTES));
    local_time > deadline
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CheckInOutRequest {
    /// Staff may act for another employee; others act for themselves.
    pub employee_id: Option<String>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AttendanceQuery {
    pub employee_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceQuery {
    pub fn includes(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

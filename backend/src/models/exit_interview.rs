use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::Document;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExitInterview {
    pub id: String,
    pub employee_id: String,
    pub interview_date: NaiveDate,
    pub last_working_day: Option<NaiveDate>,
    pub reason: String,
    pub feedback: Option<String>,
    /// Overall satisfaction, 1 to 5.
    pub rating: Option<u8>,
    pub would_recommend: Option<bool>,
    pub status: ExitInterviewStatus,
    /// User who recorded the interview.
    pub conducted_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for ExitInterview {
    const COLLECTION: &'static str = "exit_interviews";

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExitInterviewStatus {
    #[default]
    Scheduled,
    Completed,
}

impl ExitInterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitInterviewStatus::Scheduled => "scheduled",
            ExitInterviewStatus::Completed => "completed",
        }
    }
}

impl ExitInterview {
    pub fn from_create(payload: CreateExitInterview, conducted_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            employee_id: payload.employee_id,
            interview_date: payload.interview_date,
            last_working_day: payload.last_working_day,
            reason: payload.reason,
            feedback: payload.feedback,
            rating: payload.rating,
            would_recommend: payload.would_recommend,
            status: payload.status.unwrap_or_default(),
            conducted_by: Some(conducted_by.to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: UpdateExitInterview) {
        if let Some(interview_date) = update.interview_date {
            self.interview_date = interview_date;
        }
        if let Some(last_working_day) = update.last_working_day {
            self.last_working_day = Some(last_working_day);
        }
        if let Some(reason) = update.reason {
            self.reason = reason;
        }
        if let Some(feedback) = update.feedback {
            self.feedback = Some(feedback);
        }
        if let Some(rating) = update.rating {
            self.rating = Some(rating);
        }
        if let Some(would_recommend) = update.would_recommend {
            self.would_recommend = Some(would_recommend);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_completed(&self) -> bool {
        self.status == ExitInterviewStatus::Completed
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExitInterview {
    pub employee_id: String,
    pub interview_date: NaiveDate,
    pub last_working_day: Option<NaiveDate>,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    pub would_recommend: Option<bool>,
    pub status: Option<ExitInterviewStatus>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateExitInterview {
    pub interview_date: Option<NaiveDate>,
    pub last_working_day: Option<NaiveDate>,
    #[validate(length(min = 1, max = 500))]
    pub reason: Option<String>,
    #[validate(length(max = 5000))]
    pub feedback: Option<String>,
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    pub would_recommend: Option<bool>,
    pub status: Option<ExitInterviewStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ExitInterviewQuery {
    pub employee_id: Option<String>,
    pub status: Option<ExitInterviewStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn create(rating: Option<u8>) -> CreateExitInterview {
        CreateExitInterview {
            employee_id: "e1".into(),
            interview_date: NaiveDate::from_ymd_opt(2024, 9, 30).unwrap(),
            last_working_day: None,
            reason: "Relocation".into(),
            feedback: None,
            rating,
            would_recommend: Some(true),
            status: None,
        }
    }

    #[test]
    fn rating_must_be_between_one_and_five() {
        assert!(create(Some(5)).validate().is_ok());
        assert!(create(None).validate().is_ok());
        assert!(create(Some(0)).validate().is_err());
        assert!(create(Some(6)).validate().is_err());
    }

    #[test]
    fn update_completes_interview() {
        let mut interview = ExitInterview::from_create(create(Some(4)), "hr-1");
        assert_eq!(interview.status, ExitInterviewStatus::Scheduled);
        interview.apply_update(UpdateExitInterview {
            status: Some(ExitInterviewStatus::Completed),
            feedback: Some("Great team".into()),
            ..Default::default()
        });
        assert!(interview.is_completed());
        assert_eq!(interview.feedback.as_deref(), Some("Great team"));
        assert_eq!(interview.rating, Some(4));
    }
}

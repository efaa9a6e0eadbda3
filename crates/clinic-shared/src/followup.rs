//! Post-check follow-up tasks.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SharedError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Pending,
    Completed,
    Overdue,
    Cancelled,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::Completed => "completed",
            FollowUpStatus::Overdue => "overdue",
            FollowUpStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Improved,
    Same,
    Worse,
    Resolved,
}

impl FromStr for Outcome {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "improved" => Ok(Outcome::Improved),
            "same" => Ok(Outcome::Same),
            "worse" => Ok(Outcome::Worse),
            "resolved" => Ok(Outcome::Resolved),
            other => Err(SharedError::UnknownOutcome(other.to_string())),
        }
    }
}

/// A follow-up scheduled after a symptom check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUp {
    pub id: Uuid,
    #[serde(default)]
    pub symptom_record: Option<Uuid>,
    #[serde(default)]
    pub student_name: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: FollowUpStatus,
    #[serde(default)]
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub response_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub still_experiencing_symptoms: Option<bool>,
    #[serde(default)]
    pub new_symptoms: Vec<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default)]
    pub requires_appointment: bool,
    #[serde(default)]
    pub is_overdue: bool,
}

/// A student's answer to a follow-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUpResponse {
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub still_experiencing_symptoms: bool,
    #[serde(default)]
    pub new_symptoms: Vec<String>,
}

/// Staff review of a responded follow-up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FollowUpReview {
    pub review_notes: String,
    pub requires_appointment: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_parses_lowercase_names() {
        assert_eq!("worse".parse::<Outcome>().unwrap(), Outcome::Worse);
        assert!("better".parse::<Outcome>().is_err());
    }

    #[test]
    fn follow_up_defaults_optional_fields() {
        let follow_up: FollowUp = serde_json::from_value(serde_json::json!({
            "id": "7d9f3c7e-6a57-4a8e-9a55-2b0c1b8f3a10",
            "scheduled_date": "2024-09-05",
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(follow_up.status, FollowUpStatus::Pending);
        assert!(follow_up.new_symptoms.is_empty());
        assert!(!follow_up.is_overdue);
    }
}

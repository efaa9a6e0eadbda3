//! Medication schedules and per-dose adherence logs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prescribed medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: Uuid,
    #[serde(default)]
    pub student: Option<i64>,
    #[serde(default)]
    pub student_name: Option<String>,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    /// Time-of-day strings such as `"08:00"`.
    #[serde(default)]
    pub schedule_times: Vec<String>,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    pub is_active: bool,
}

/// Body for creating or updating a medication (staff only).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationCreateData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_times: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Pending,
    Taken,
    Missed,
    Skipped,
}

/// One scheduled dose.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationLog {
    pub id: Uuid,
    pub medication: Uuid,
    #[serde(default)]
    pub medication_name: Option<String>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: String,
    pub status: LogStatus,
    #[serde(default)]
    pub taken_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_overdue: bool,
}

/// Aggregated adherence figures for a student and date range.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdherenceStats {
    pub total_doses: u32,
    pub taken_doses: u32,
    pub missed_doses: u32,
    pub pending_doses: u32,
    pub adherence_rate: f64,
}

/// Filter for `GET /medications/adherence/`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct AdherenceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Percentage of doses taken, rounded to the nearest integer.
///
/// An empty schedule counts as full adherence.
pub fn adherence_percentage(logs: &[MedicationLog]) -> u32 {
    if logs.is_empty() {
        return 100;
    }
    let taken = logs
        .iter()
        .filter(|log| log.status == LogStatus::Taken)
        .count();
    ((taken as f64 / logs.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(status: LogStatus) -> MedicationLog {
        MedicationLog {
            id: Uuid::new_v4(),
            medication: Uuid::new_v4(),
            medication_name: None,
            scheduled_date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
            scheduled_time: "08:00".into(),
            status,
            taken_at: None,
            notes: None,
            is_overdue: false,
        }
    }

    #[test]
    fn empty_schedule_is_full_adherence() {
        assert_eq!(adherence_percentage(&[]), 100);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let logs = [
            log(LogStatus::Taken),
            log(LogStatus::Taken),
            log(LogStatus::Missed),
        ];
        assert_eq!(adherence_percentage(&logs), 67);
    }

    #[test]
    fn adherence_stats_tolerate_missing_fields() {
        let stats: AdherenceStats =
            serde_json::from_value(serde_json::json!({ "taken_doses": 4 })).unwrap();
        assert_eq!(stats.taken_doses, 4);
        assert_eq!(stats.total_doses, 0);
    }
}

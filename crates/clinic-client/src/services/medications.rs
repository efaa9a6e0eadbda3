use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use clinic_shared::medication::{
    AdherenceQuery, AdherenceStats, Medication, MedicationCreateData, MedicationLog,
};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::services::normalize_list;

#[derive(Clone)]
pub struct MedicationService {
    api: Arc<ApiClient>,
}

impl MedicationService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Medications of the signed-in student.
    pub async fn list(&self) -> Result<Vec<Medication>, ApiError> {
        let payload = self.api.get_value("/medications/").await?;
        normalize_list(payload, "medications")
    }

    /// Medications of one student (staff only).
    pub async fn list_for_student(&self, student_id: i64) -> Result<Vec<Medication>, ApiError> {
        let payload = self
            .api
            .get_value_with("/medications/", &[("student_id", student_id)])
            .await?;
        normalize_list(payload, "medications")
    }

    pub async fn get(&self, id: Uuid) -> Result<Medication, ApiError> {
        self.api.get(&format!("/medications/{id}/")).await
    }

    pub async fn create(&self, data: &MedicationCreateData) -> Result<Medication, ApiError> {
        self.api.post("/medications/create/", data).await
    }

    pub async fn update(&self, id: Uuid, data: &MedicationCreateData) -> Result<Medication, ApiError> {
        self.api.put(&format!("/medications/update/{id}/"), data).await
    }

    pub async fn todays_logs(&self) -> Result<Vec<MedicationLog>, ApiError> {
        let payload = self.api.get_value("/medications/logs/today/").await?;
        normalize_list(payload, "logs")
    }

    pub async fn mark_taken(&self, log_id: Uuid, notes: Option<&str>) -> Result<MedicationLog, ApiError> {
        self.api
            .post(
                &format!("/medications/logs/{log_id}/taken/"),
                &json!({ "notes": notes }),
            )
            .await
    }

    pub async fn adherence(&self, query: &AdherenceQuery) -> Result<AdherenceStats, ApiError> {
        self.api.get_with("/medications/adherence/", query).await
    }
}

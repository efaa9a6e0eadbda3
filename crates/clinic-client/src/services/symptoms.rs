use std::sync::Arc;

use uuid::Uuid;

use clinic_shared::symptoms::{PredictionResult, Symptom, SymptomRecord, SymptomSubmission};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::services::{normalize_list, unwrap_entity};

#[derive(Clone)]
pub struct SymptomService {
    api: Arc<ApiClient>,
}

impl SymptomService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Symptoms the prediction model recognises (`{ count, symptoms }`).
    pub async fn available(&self) -> Result<Vec<Symptom>, ApiError> {
        let payload = self.api.get_value("/symptoms/available/").await?;
        normalize_list(payload, "symptoms")
    }

    /// Submit symptoms for prediction. The response wraps the prediction
    /// together with the archived record id.
    pub async fn submit(&self, submission: &SymptomSubmission) -> Result<PredictionResult, ApiError> {
        let payload = self.api.post_value("/symptoms/submit/", submission).await?;
        unwrap_entity(payload, "prediction")
    }

    /// Archived checks, possibly paginated under `results`.
    pub async fn history(&self) -> Result<Vec<SymptomRecord>, ApiError> {
        let payload = self.api.get_value("/symptoms/").await?;
        normalize_list(payload, "results")
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.api.delete(&format!("/symptoms/{id}/")).await
    }
}

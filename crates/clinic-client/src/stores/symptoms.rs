use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use clinic_shared::symptoms::{PredictionResult, Symptom, SymptomRecord, SymptomSubmission};

use crate::error::ApiError;
use crate::services::SymptomService;
use crate::stores::{describe, lock, ActionScope, Sequence, Status, StoreState};

#[derive(Default)]
struct SymptomState {
    available: Vec<Symptom>,
    selected: Vec<String>,
    prediction: Option<PredictionResult>,
    history: Vec<SymptomRecord>,
    available_seq: Sequence,
    history_seq: Sequence,
    status: Status,
}

impl StoreState for SymptomState {
    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Symptom-checker state: the catalogue, the current selection, the last
/// prediction and the student's check history.
pub struct SymptomStore {
    service: SymptomService,
    state: Mutex<SymptomState>,
}

impl SymptomStore {
    pub fn new(service: SymptomService) -> Self {
        Self {
            service,
            state: Mutex::new(SymptomState::default()),
        }
    }

    pub fn available_symptoms(&self) -> Vec<Symptom> {
        lock(&self.state).available.clone()
    }

    pub fn selected_symptoms(&self) -> Vec<String> {
        lock(&self.state).selected.clone()
    }

    pub fn prediction(&self) -> Option<PredictionResult> {
        lock(&self.state).prediction.clone()
    }

    pub fn history(&self) -> Vec<SymptomRecord> {
        lock(&self.state).history.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).status().loading()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).status().error().map(String::from)
    }

    pub async fn fetch_available_symptoms(&self) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).available_seq.next();

        let result = self.service.available().await;

        let mut state = lock(&self.state);
        let latest = state.available_seq.is_latest(ticket);
        match result {
            Ok(symptoms) if latest => {
                debug!(count = symptoms.len(), "Symptom catalogue loaded");
                state.available = symptoms;
            }
            Ok(_) => debug!(ticket, "Discarding stale symptom catalogue"),
            Err(e) => {
                warn!(error = %e, "Failed to load symptoms");
                if latest {
                    state.status.fail(e.user_message("Failed to load symptoms"));
                }
            }
        }
    }

    /// Submit a symptom set with the default duration and severity.
    pub async fn submit_symptoms(
        &self,
        symptoms: Vec<String>,
        generate_insights: bool,
    ) -> Result<PredictionResult, ApiError> {
        let _scope = ActionScope::begin(&self.state);
        let submission = SymptomSubmission::new(symptoms, generate_insights);

        match self.service.submit(&submission).await {
            Ok(prediction) => {
                info!(
                    disease = %prediction.predicted_disease,
                    confidence = prediction.confidence(),
                    "Prediction received"
                );
                lock(&self.state).prediction = Some(prediction.clone());
                Ok(prediction)
            }
            Err(e) => {
                warn!(error = %e, "Symptom prediction failed");
                lock(&self.state).status.fail(describe(
                    &e,
                    "Prediction failed",
                    "Prediction failed. Please try again.",
                ));
                Err(e)
            }
        }
    }

    pub async fn fetch_history(&self) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).history_seq.next();

        let result = self.service.history().await;

        let mut state = lock(&self.state);
        let latest = state.history_seq.is_latest(ticket);
        match result {
            Ok(records) if latest => state.history = records,
            Ok(_) => debug!(ticket, "Discarding stale symptom history"),
            Err(e) => {
                warn!(error = %e, "Failed to load symptom history");
                if latest {
                    state.status.fail(e.user_message("Failed to load history"));
                }
            }
        }
    }

    /// Delete a history record on the server, then drop it locally.
    pub async fn delete_record(&self, id: Uuid) -> Result<(), ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.delete(id).await {
            Ok(()) => {
                let mut state = lock(&self.state);
                state.history_seq.supersede();
                state.history.retain(|record| record.id != id);
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to delete symptom record");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to delete record"));
                Err(e)
            }
        }
    }

    /// Add `name` to the selection, or remove it if already selected.
    pub fn toggle_symptom(&self, name: &str) {
        let mut state = lock(&self.state);
        match state.selected.iter().position(|s| s == name) {
            Some(index) => {
                state.selected.remove(index);
            }
            None => state.selected.push(name.to_string()),
        }
    }

    pub fn clear_selection(&self) {
        let mut state = lock(&self.state);
        state.selected.clear();
        state.prediction = None;
    }
}

use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use clinic_shared::medication::{
    adherence_percentage, AdherenceQuery, AdherenceStats, LogStatus, Medication,
    MedicationCreateData, MedicationLog,
};

use crate::error::ApiError;
use crate::services::MedicationService;
use crate::stores::{lock, replace_by, upsert_by, ActionScope, Sequence, Status, StoreState};

#[derive(Default)]
struct MedicationState {
    medications: Vec<Medication>,
    todays_logs: Vec<MedicationLog>,
    adherence: Option<AdherenceStats>,
    medications_seq: Sequence,
    logs_seq: Sequence,
    adherence_seq: Sequence,
    status: Status,
}

impl StoreState for MedicationState {
    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Medications, today's dose logs and adherence statistics.
pub struct MedicationStore {
    service: MedicationService,
    state: Mutex<MedicationState>,
}

impl MedicationStore {
    pub fn new(service: MedicationService) -> Self {
        Self {
            service,
            state: Mutex::new(MedicationState::default()),
        }
    }

    // ─── Cached state ───

    pub fn medications(&self) -> Vec<Medication> {
        lock(&self.state).medications.clone()
    }

    pub fn todays_logs(&self) -> Vec<MedicationLog> {
        lock(&self.state).todays_logs.clone()
    }

    pub fn adherence_stats(&self) -> Option<AdherenceStats> {
        lock(&self.state).adherence.clone()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).status().loading()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).status().error().map(String::from)
    }

    pub fn clear_error(&self) {
        lock(&self.state).status_mut().clear_error();
    }

    // ─── Derived views ───

    pub fn active_medications(&self) -> Vec<Medication> {
        self.medications_where(|m| m.is_active)
    }

    pub fn inactive_medications(&self) -> Vec<Medication> {
        self.medications_where(|m| !m.is_active)
    }

    pub fn pending_logs(&self) -> Vec<MedicationLog> {
        self.logs_where(|log| log.status == LogStatus::Pending)
    }

    pub fn taken_logs(&self) -> Vec<MedicationLog> {
        self.logs_where(|log| log.status == LogStatus::Taken)
    }

    pub fn missed_logs(&self) -> Vec<MedicationLog> {
        self.logs_where(|log| log.status == LogStatus::Missed)
    }

    /// Pending doses whose scheduled time has passed.
    pub fn overdue_logs(&self) -> Vec<MedicationLog> {
        self.logs_where(|log| log.is_overdue && log.status == LogStatus::Pending)
    }

    /// Percentage of today's doses taken; 100 when nothing is scheduled.
    pub fn todays_adherence(&self) -> u32 {
        adherence_percentage(&lock(&self.state).todays_logs)
    }

    fn medications_where(&self, pred: impl Fn(&Medication) -> bool) -> Vec<Medication> {
        lock(&self.state)
            .medications
            .iter()
            .filter(|m| pred(m))
            .cloned()
            .collect()
    }

    fn logs_where(&self, pred: impl Fn(&MedicationLog) -> bool) -> Vec<MedicationLog> {
        lock(&self.state)
            .todays_logs
            .iter()
            .filter(|log| pred(log))
            .cloned()
            .collect()
    }

    // ─── Read actions ───

    /// Load the signed-in student's medications, or one student's when
    /// `student_id` is given (staff).
    pub async fn fetch_medications(&self, student_id: Option<i64>) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).medications_seq.next();

        let result = match student_id {
            Some(id) => self.service.list_for_student(id).await,
            None => self.service.list().await,
        };

        let mut state = lock(&self.state);
        let latest = state.medications_seq.is_latest(ticket);
        match result {
            Ok(medications) if latest => {
                debug!(count = medications.len(), "Medications loaded");
                state.medications = medications;
            }
            Ok(_) => debug!(ticket, "Discarding stale medication list"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch medications");
                if latest {
                    state
                        .status
                        .fail(e.user_message("Failed to fetch medications"));
                }
            }
        }
    }

    /// Load one medication and merge it into the cached list.
    pub async fn fetch_medication(&self, id: Uuid) -> Option<Medication> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.get(id).await {
            Ok(medication) => {
                let mut state = lock(&self.state);
                state.medications_seq.supersede();
                upsert_by(&mut state.medications, medication.clone(), |m| m.id);
                Some(medication)
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to fetch medication");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to fetch medication"));
                None
            }
        }
    }

    pub async fn fetch_todays_logs(&self) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).logs_seq.next();

        let result = self.service.todays_logs().await;

        let mut state = lock(&self.state);
        let latest = state.logs_seq.is_latest(ticket);
        match result {
            Ok(logs) if latest => state.todays_logs = logs,
            Ok(_) => debug!(ticket, "Discarding stale medication logs"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch today's logs");
                if latest {
                    state
                        .status
                        .fail(e.user_message("Failed to fetch today's logs"));
                }
            }
        }
    }

    pub async fn fetch_adherence(&self, query: &AdherenceQuery) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).adherence_seq.next();

        let result = self.service.adherence(query).await;

        let mut state = lock(&self.state);
        let latest = state.adherence_seq.is_latest(ticket);
        match result {
            Ok(stats) if latest => state.adherence = Some(stats),
            Ok(_) => debug!(ticket, "Discarding stale adherence statistics"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch adherence");
                if latest {
                    state
                        .status
                        .fail(e.user_message("Failed to fetch adherence statistics"));
                }
            }
        }
    }

    // ─── Mutating actions ───

    pub async fn create_medication(&self, data: &MedicationCreateData) -> Result<Medication, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.create(data).await {
            Ok(medication) => {
                info!(id = %medication.id, name = %medication.name, "Medication created");
                let mut state = lock(&self.state);
                state.medications_seq.supersede();
                state.medications.push(medication.clone());
                Ok(medication)
            }
            Err(e) => {
                warn!(error = %e, "Failed to create medication");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to create medication"));
                Err(e)
            }
        }
    }

    pub async fn update_medication(
        &self,
        id: Uuid,
        data: &MedicationCreateData,
    ) -> Result<Medication, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.update(id, data).await {
            Ok(medication) => {
                let mut state = lock(&self.state);
                state.medications_seq.supersede();
                replace_by(&mut state.medications, medication.clone(), |m| m.id);
                Ok(medication)
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to update medication");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to update medication"));
                Err(e)
            }
        }
    }

    /// Mark one dose as taken and replace only that entry in today's logs.
    pub async fn mark_log_as_taken(
        &self,
        log_id: Uuid,
        notes: Option<&str>,
    ) -> Result<MedicationLog, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.mark_taken(log_id, notes).await {
            Ok(log) => {
                let mut state = lock(&self.state);
                state.logs_seq.supersede();
                if !replace_by(&mut state.todays_logs, log.clone(), |l| l.id) {
                    debug!(%log_id, "Marked log is not in today's cache");
                }
                Ok(log)
            }
            Err(e) => {
                warn!(%log_id, error = %e, "Failed to mark medication as taken");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to mark medication as taken"));
                Err(e)
            }
        }
    }
}

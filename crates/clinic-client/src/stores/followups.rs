use std::sync::Mutex;

use tracing::{debug, info, warn};
use uuid::Uuid;

use clinic_shared::followup::{FollowUp, FollowUpResponse, FollowUpReview, FollowUpStatus};

use crate::error::ApiError;
use crate::services::FollowUpService;
use crate::stores::{lock, upsert_by, ActionScope, Sequence, Status, StoreState};

#[derive(Default)]
struct FollowUpState {
    follow_ups: Vec<FollowUp>,
    pending: Vec<FollowUp>,
    needs_review: Vec<FollowUp>,
    follow_ups_seq: Sequence,
    pending_seq: Sequence,
    review_seq: Sequence,
    status: Status,
}

impl StoreState for FollowUpState {
    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// Follow-up check-ins for students and the staff review queue.
pub struct FollowUpStore {
    service: FollowUpService,
    state: Mutex<FollowUpState>,
}

impl FollowUpStore {
    pub fn new(service: FollowUpService) -> Self {
        Self {
            service,
            state: Mutex::new(FollowUpState::default()),
        }
    }

    pub fn follow_ups(&self) -> Vec<FollowUp> {
        lock(&self.state).follow_ups.clone()
    }

    pub fn pending(&self) -> Vec<FollowUp> {
        lock(&self.state).pending.clone()
    }

    pub fn needs_review(&self) -> Vec<FollowUp> {
        lock(&self.state).needs_review.clone()
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

    /// Pending follow-ups flagged overdue by the server.
    pub fn overdue(&self) -> Vec<FollowUp> {
        lock(&self.state)
            .pending
            .iter()
            .filter(|f| f.is_overdue)
            .cloned()
            .collect()
    }

    pub fn upcoming(&self) -> Vec<FollowUp> {
        lock(&self.state)
            .pending
            .iter()
            .filter(|f| !f.is_overdue)
            .cloned()
            .collect()
    }

    pub fn completed(&self) -> Vec<FollowUp> {
        lock(&self.state)
            .follow_ups
            .iter()
            .filter(|f| f.status == FollowUpStatus::Completed)
            .cloned()
            .collect()
    }

    pub fn total_pending(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn total_overdue(&self) -> usize {
        lock(&self.state).pending.iter().filter(|f| f.is_overdue).count()
    }

    // ─── Read actions ───

    pub async fn fetch_follow_ups(&self, status: Option<FollowUpStatus>) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).follow_ups_seq.next();

        let result = self.service.list(status).await;

        let mut state = lock(&self.state);
        let latest = state.follow_ups_seq.is_latest(ticket);
        match result {
            Ok(list) if latest => state.follow_ups = list,
            Ok(_) => debug!(ticket, "Discarding stale follow-up list"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch follow-ups");
                if latest {
                    state.status.fail(e.user_message("Failed to fetch follow-ups"));
                }
            }
        }
    }

    pub async fn fetch_pending_follow_ups(&self) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).pending_seq.next();

        let result = self.service.pending().await;

        let mut state = lock(&self.state);
        let latest = state.pending_seq.is_latest(ticket);
        match result {
            Ok(list) if latest => {
                debug!(count = list.len(), "Pending follow-ups loaded");
                state.pending = list;
            }
            Ok(_) => debug!(ticket, "Discarding stale pending follow-ups"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch pending follow-ups");
                if latest {
                    state
                        .status
                        .fail(e.user_message("Failed to fetch pending follow-ups"));
                }
            }
        }
    }

    /// Staff queue of answered follow-ups awaiting review.
    pub async fn fetch_needs_review(&self) {
        let _scope = ActionScope::begin(&self.state);
        let ticket = lock(&self.state).review_seq.next();

        let result = self.service.needs_review().await;

        let mut state = lock(&self.state);
        let latest = state.review_seq.is_latest(ticket);
        match result {
            Ok(list) if latest => state.needs_review = list,
            Ok(_) => debug!(ticket, "Discarding stale review queue"),
            Err(e) => {
                warn!(error = %e, "Failed to fetch follow-up reviews");
                if latest {
                    state.status.fail(e.user_message("Failed to fetch reviews"));
                }
            }
        }
    }

    // ─── Mutating actions ───

    /// Submit the student's answer. On success the follow-up leaves the
    /// pending list and the updated entry is merged into the full list.
    pub async fn respond_to_follow_up(
        &self,
        id: Uuid,
        response: &FollowUpResponse,
    ) -> Result<FollowUp, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.respond(id, response).await {
            Ok(updated) => {
                info!(%id, outcome = ?response.outcome, "Follow-up answered");
                let mut state = lock(&self.state);
                state.pending_seq.supersede();
                state.follow_ups_seq.supersede();
                state.pending.retain(|f| f.id != id);
                upsert_by(&mut state.follow_ups, updated.clone(), |f| f.id);
                Ok(updated)
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to respond to follow-up");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to submit response"));
                Err(e)
            }
        }
    }

    pub async fn review_follow_up(
        &self,
        id: Uuid,
        review: &FollowUpReview,
    ) -> Result<FollowUp, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.review(id, review).await {
            Ok(updated) => {
                info!(%id, requires_appointment = review.requires_appointment, "Follow-up reviewed");
                let mut state = lock(&self.state);
                state.review_seq.supersede();
                state.follow_ups_seq.supersede();
                state.needs_review.retain(|f| f.id != id);
                upsert_by(&mut state.follow_ups, updated.clone(), |f| f.id);
                Ok(updated)
            }
            Err(e) => {
                warn!(%id, error = %e, "Failed to review follow-up");
                lock(&self.state)
                    .status
                    .fail(e.user_message("Failed to submit review"));
                Err(e)
            }
        }
    }
}

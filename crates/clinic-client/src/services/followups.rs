use std::sync::Arc;

use uuid::Uuid;

use clinic_shared::followup::{FollowUp, FollowUpResponse, FollowUpReview, FollowUpStatus};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::services::{normalize_list, unwrap_entity};

#[derive(Clone)]
pub struct FollowUpService {
    api: Arc<ApiClient>,
}

impl FollowUpService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn list(&self, status: Option<FollowUpStatus>) -> Result<Vec<FollowUp>, ApiError> {
        let payload = match status {
            Some(status) => {
                self.api
                    .get_value_with("/followups/", &[("status", status.as_str())])
                    .await?
            }
            None => self.api.get_value("/followups/").await?,
        };
        normalize_list(payload, "followups")
    }

    pub async fn pending(&self) -> Result<Vec<FollowUp>, ApiError> {
        let payload = self.api.get_value("/followups/pending/").await?;
        normalize_list(payload, "followups")
    }

    /// Submit a student's response. The server answers `{ message, followup }`.
    pub async fn respond(&self, id: Uuid, response: &FollowUpResponse) -> Result<FollowUp, ApiError> {
        let payload = self
            .api
            .post_value(&format!("/followups/{id}/respond/"), response)
            .await?;
        unwrap_entity(payload, "followup")
    }

    /// Staff review of a responded follow-up.
    pub async fn review(&self, id: Uuid, review: &FollowUpReview) -> Result<FollowUp, ApiError> {
        let payload = self
            .api
            .post_value(&format!("/followups/{id}/review/"), review)
            .await?;
        unwrap_entity(payload, "followup")
    }

    /// Follow-ups awaiting staff review.
    pub async fn needs_review(&self) -> Result<Vec<FollowUp>, ApiError> {
        let payload = self.api.get_value("/followups/needs-review/").await?;
        normalize_list(payload, "followups")
    }
}

use std::sync::Arc;

use serde_json::json;

use clinic_shared::user::{AuthResponse, LoginCredentials, ProfileUpdate, RegisterData, User};

use crate::api::ApiClient;
use crate::error::ApiError;

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        self.api.post("/auth/login/", credentials).await
    }

    pub async fn register(&self, data: &RegisterData) -> Result<AuthResponse, ApiError> {
        self.api.post("/auth/register/", data).await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .post_value("/auth/logout/", &json!({}))
            .await?;
        Ok(())
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.api.get("/profile/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.api.patch("/profile/", update).await
    }
}

//! Composition root.
//!
//! [`AppState`] wires one API client and one instance of every container
//! together. Nothing in the crate is global; callers (the binary, tests)
//! build their own state from a storage backend and a navigator.

use std::sync::Arc;

use clinic_store::KeyValueStorage;
use tracing::info;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::credential::SessionCredential;
use crate::error::ClientError;
use crate::router::{GuardDecision, Navigator, Router};
use crate::services::{AuthService, ChatService, FollowUpService, MedicationService, SymptomService};
use crate::stores::{AuthStore, ChatStore, FollowUpStore, MedicationStore, SymptomStore};

pub struct AppState {
    pub config: ClientConfig,
    pub credential: Arc<SessionCredential>,
    pub api: Arc<ApiClient>,
    pub router: Router,
    pub auth: AuthStore,
    pub symptoms: SymptomStore,
    pub chat: ChatStore,
    pub medications: MedicationStore,
    pub followups: FollowUpStore,
}

impl AppState {
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStorage>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientError> {
        let credential = Arc::new(SessionCredential::new(storage));
        let api = Arc::new(ApiClient::new(&config, credential.clone(), navigator)?);

        info!(api_url = %api.base_url(), "Client state initialised");

        Ok(Self {
            auth: AuthStore::new(AuthService::new(api.clone()), credential.clone()),
            symptoms: SymptomStore::new(SymptomService::new(api.clone())),
            chat: ChatStore::new(ChatService::new(api.clone())),
            medications: MedicationStore::new(MedicationService::new(api.clone())),
            followups: FollowUpStore::new(FollowUpService::new(api.clone())),
            router: Router::new(),
            config,
            credential,
            api,
        })
    }

    /// Restore a persisted session, if any.
    pub async fn bootstrap(&self) {
        self.auth.check_auth().await;
    }

    /// Run the navigation guard for `full_path` against the current session.
    pub fn navigate(&self, full_path: &str) -> GuardDecision {
        self.router.navigate(full_path, &self.auth)
    }
}

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use clinic_shared::user::{AuthResponse, LoginCredentials, ProfileUpdate, RegisterData, User};
use clinic_shared::Role;

use crate::credential::SessionCredential;
use crate::error::ApiError;
use crate::router::SessionView;
use crate::services::AuthService;
use crate::stores::{describe, lock, ActionScope, Status, StoreState};

#[derive(Default)]
struct AuthState {
    user: Option<User>,
    status: Status,
}

impl StoreState for AuthState {
    fn status(&self) -> &Status {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

/// The signed-in user and the persisted session credential.
///
/// A session is authenticated only when both a token and a user profile are
/// present; a persisted token alone is resolved by [`AuthStore::check_auth`].
pub struct AuthStore {
    service: AuthService,
    credential: Arc<SessionCredential>,
    state: Mutex<AuthState>,
}

impl AuthStore {
    pub fn new(service: AuthService, credential: Arc<SessionCredential>) -> Self {
        Self {
            service,
            credential,
            state: Mutex::new(AuthState::default()),
        }
    }

    pub fn user(&self) -> Option<User> {
        lock(&self.state).user.clone()
    }

    /// Display name, empty when signed out.
    pub fn user_name(&self) -> String {
        lock(&self.state)
            .user
            .as_ref()
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_present() && lock(&self.state).user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        lock(&self.state).user.as_ref().map(|u| u.role)
    }

    pub fn token(&self) -> Option<String> {
        self.credential.token()
    }

    pub fn loading(&self) -> bool {
        lock(&self.state).status().loading()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).status().error().map(String::from)
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.login(credentials).await {
            Ok(response) => {
                info!(school_id = %credentials.school_id, "Logged in");
                Ok(self.start_session(response))
            }
            Err(e) => {
                warn!(school_id = %credentials.school_id, error = %e, "Login failed");
                lock(&self.state).status.fail(describe(
                    &e,
                    "Login failed",
                    "Login failed. Please try again.",
                ));
                Err(e)
            }
        }
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.register(data).await {
            Ok(response) => {
                info!(school_id = %data.school_id, "Registered");
                Ok(self.start_session(response))
            }
            Err(e) => {
                warn!(school_id = %data.school_id, error = %e, "Registration failed");
                lock(&self.state).status.fail(describe(
                    &e,
                    "Registration failed",
                    "Registration failed. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Tell the server, then drop the local session whatever it answered.
    pub async fn logout(&self) {
        if let Err(e) = self.service.logout().await {
            warn!(error = %e, "Logout request failed, clearing session anyway");
        }
        self.end_session();
        info!("Logged out");
    }

    /// Refresh the profile when a token is stored. A 401 ends the session
    /// locally; other failures keep the current state.
    pub async fn fetch_profile(&self) {
        if !self.credential.is_present() {
            return;
        }

        match self.service.profile().await {
            Ok(user) => {
                debug!(school_id = %user.school_id, role = %user.role, "Profile loaded");
                lock(&self.state).user = Some(user);
            }
            Err(e) if e.is_unauthorized() => {
                warn!("Stored token rejected, ending session");
                self.end_session();
            }
            Err(e) => warn!(error = %e, "Failed to load profile"),
        }
    }

    /// Session bootstrap: resolve a persisted token into a user.
    pub async fn check_auth(&self) {
        if self.credential.is_present() {
            self.fetch_profile().await;
        }
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let _scope = ActionScope::begin(&self.state);

        match self.service.update_profile(update).await {
            Ok(user) => {
                lock(&self.state).user = Some(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "Profile update failed");
                lock(&self.state).status.fail(e.user_message("Update failed"));
                Err(e)
            }
        }
    }

    fn start_session(&self, response: AuthResponse) -> User {
        self.credential.store(&response.token);
        lock(&self.state).user = Some(response.user.clone());
        response.user
    }

    fn end_session(&self) {
        self.credential.clear();
        lock(&self.state).user = None;
    }
}

impl SessionView for AuthStore {
    fn is_authenticated(&self) -> bool {
        AuthStore::is_authenticated(self)
    }

    fn role(&self) -> Option<Role> {
        AuthStore::role(self)
    }
}

//! Session credential.
//!
//! The only module that knows where the token is persisted and how it is
//! presented to the API. Every other layer goes through [`SessionCredential`].

use std::sync::Arc;

use tracing::{debug, error};

use clinic_shared::constants::{AUTH_SCHEME, AUTH_TOKEN_KEY};
use clinic_store::KeyValueStorage;

pub struct SessionCredential {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionCredential {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// The persisted token, read from storage on every call.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(AUTH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                error!(error = %e, "Failed to read session credential");
                None
            }
        }
    }

    pub fn is_present(&self) -> bool {
        self.token().is_some()
    }

    pub fn store(&self, token: &str) {
        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, token) {
            error!(error = %e, "Failed to persist session credential");
        }
    }

    pub fn clear(&self) {
        match self.storage.remove(AUTH_TOKEN_KEY) {
            Ok(true) => debug!("Session credential cleared"),
            Ok(false) => {}
            Err(e) => error!(error = %e, "Failed to clear session credential"),
        }
    }

    /// Value of the `Authorization` header, if a token is present.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|token| format!("{AUTH_SCHEME} {token}"))
    }
}

//! Shared fixtures: an in-process mock backend and a client wired to it.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;

use clinic_client::router::{ChannelNavigator, Navigation};
use clinic_client::{AppState, ClientConfig};
use clinic_shared::constants::AUTH_TOKEN_KEY;
use clinic_store::{KeyValueStorage, MemoryStorage};

/// Serve `app` on an ephemeral local port and return the API base URL.
pub async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/api")
}

pub struct TestClient {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
    pub navigations: UnboundedReceiver<Navigation>,
}

impl TestClient {
    pub async fn new(app: Router) -> Self {
        Self::with_token(app, None).await
    }

    pub async fn with_token(app: Router, token: Option<&str>) -> Self {
        let api_url = spawn_backend(app).await;
        Self::connect(&api_url, token)
    }

    /// Build a client against `api_url` without starting a backend.
    pub fn connect(api_url: &str, token: Option<&str>) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        if let Some(token) = token {
            storage.set(AUTH_TOKEN_KEY, token).unwrap();
        }

        let config = ClientConfig {
            api_url: api_url.to_string(),
            timeout: Duration::from_secs(5),
            data_dir: None,
        };
        let (navigator, navigations) = ChannelNavigator::new();
        let backend: Arc<dyn KeyValueStorage> = storage.clone();
        let state = AppState::new(config, backend, Arc::new(navigator)).unwrap();

        Self {
            state,
            storage,
            navigations,
        }
    }

    pub fn stored_token(&self) -> Option<String> {
        self.storage.get(AUTH_TOKEN_KEY).unwrap()
    }

    pub fn drain_navigations(&mut self) -> Vec<Navigation> {
        let mut drained = Vec::new();
        while let Ok(navigation) = self.navigations.try_recv() {
            drained.push(navigation);
        }
        drained
    }
}

// ─── Payload fixtures ───

pub fn user_json(school_id: &str, role: &str) -> Value {
    json!({
        "id": 7,
        "school_id": school_id,
        "name": "Maria Santos",
        "role": role,
        "department": "College of Nursing",
        "year_level": 2,
        "data_consent_given": true,
        "date_joined": "2025-06-01T08:00:00Z"
    })
}

pub fn medication_json(id: &str, name: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "student": 7,
        "name": name,
        "dosage": "500mg",
        "frequency": "twice daily",
        "schedule_times": ["08:00", "20:00"],
        "start_date": "2026-10-01",
        "is_active": is_active
    })
}

pub fn log_json(id: &str, status: &str, is_overdue: bool) -> Value {
    json!({
        "id": id,
        "medication": "6f1c7f9e-0000-4000-8000-000000000001",
        "medication_name": "Paracetamol",
        "scheduled_date": "2026-10-19",
        "scheduled_time": "08:00",
        "status": status,
        "is_overdue": is_overdue
    })
}

pub fn followup_json(id: &str, status: &str, is_overdue: bool) -> Value {
    json!({
        "id": id,
        "student_name": "Maria Santos",
        "scheduled_date": "2026-10-18",
        "status": status,
        "new_symptoms": [],
        "requires_appointment": false,
        "is_overdue": is_overdue
    })
}

//! Client core of the school clinic portal.
//!
//! Talks to the clinic REST API, keeps the session credential in local
//! storage, caches per-domain state and decides which pages a session may
//! open.

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
pub mod router;
pub mod services;
pub mod state;
pub mod stores;

use tracing_subscriber::{fmt, EnvFilter};

pub use api::ApiClient;
pub use config::ClientConfig;
pub use credential::SessionCredential;
pub use error::{ApiError, ClientError};
pub use state::AppState;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clinic_client=debug,clinic_store=info,warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

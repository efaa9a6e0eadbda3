//! Data model shared by the clinic portal crates: entities mirrored from the
//! REST API, roles and protocol constants.

pub mod chat;
pub mod constants;
pub mod error;
pub mod followup;
pub mod medication;
pub mod symptoms;
pub mod types;
pub mod user;

pub use error::SharedError;
pub use types::{Role, Sender};

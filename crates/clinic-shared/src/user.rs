//! Account and authentication payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Profile of the signed-in account as returned by `/profile/` and the
/// login/register endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// The profile serializer does not always include the numeric id.
    #[serde(default)]
    pub id: Option<i64>,
    pub school_id: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub cpsu_address: Option<String>,
    #[serde(default)]
    pub year_level: Option<u8>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub data_consent_given: bool,
    #[serde(default)]
    pub consent_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginCredentials {
    pub school_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterData {
    pub school_id: String,
    pub password: String,
    pub password_confirm: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpsu_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_consent_given: Option<bool>,
}

/// Partial profile update sent with `PATCH /profile/`. Only the fields that
/// are set are serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpsu_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_consent_given: Option<bool>,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

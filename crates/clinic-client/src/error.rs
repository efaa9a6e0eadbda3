use serde_json::Value;
use thiserror::Error;

use clinic_store::StoreError;

/// Outcome of a failed API call, classified once at the HTTP boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// No response was received (connection failure, timeout, broken body).
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered 401. The session has already been torn down.
    #[error("Unauthorized")]
    Unauthorized { message: Option<String> },

    /// Validation failure keyed by field name, in server order.
    #[error("Validation failed ({} field(s))", .fields.len())]
    FieldErrors {
        status: u16,
        fields: Vec<(String, Vec<String>)>,
    },

    /// Any other non-success response.
    #[error("Request failed with status {status}")]
    General { status: u16, message: Option<String> },

    /// The response body did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn transport(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }

    /// Classify a non-success, non-401 response body.
    pub fn from_response(status: u16, body: &Value) -> Self {
        if let Some(message) = general_message(body) {
            return Self::General {
                status,
                message: Some(message),
            };
        }

        match body {
            Value::Object(map) if !map.is_empty() => Self::FieldErrors {
                status,
                fields: map
                    .iter()
                    .map(|(field, errors)| (field.clone(), field_messages(errors)))
                    .collect(),
            },
            _ => Self::General {
                status,
                message: None,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::FieldErrors { status, .. } | Self::General { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Message suitable for display: the first error of the first offending
    /// field, else the server's message, else `default`.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            Self::FieldErrors { fields, .. } => fields
                .first()
                .and_then(|(_, errors)| errors.first())
                .cloned()
                .unwrap_or_else(|| default.to_string()),
            Self::General {
                message: Some(message),
                ..
            }
            | Self::Unauthorized {
                message: Some(message),
            } => message.clone(),
            _ => default.to_string(),
        }
    }
}

/// Extract `error`, `message` or `detail` from an error body.
pub(crate) fn general_message(body: &Value) -> Option<String> {
    let map = body.as_object()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| map.get(*key))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
}

fn field_messages(errors: &Value) -> Vec<String> {
    match errors {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}

/// Errors raised while assembling the client itself.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_field_wins_over_field_map() {
        let err = ApiError::from_response(400, &json!({ "error": "School ID and password are required" }));
        assert_eq!(
            err,
            ApiError::General {
                status: 400,
                message: Some("School ID and password are required".into())
            }
        );
    }

    #[test]
    fn field_errors_keep_server_order() {
        let err = ApiError::from_response(
            400,
            &json!({
                "school_id": ["This field is required."],
                "password": ["Too short.", "Too common."]
            }),
        );
        assert_eq!(err.user_message("Registration failed"), "This field is required.");
        match err {
            ApiError::FieldErrors { fields, .. } => {
                assert_eq!(fields[0].0, "school_id");
                assert_eq!(fields[1].1.len(), 2);
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn scalar_field_error_is_stringified() {
        let err = ApiError::from_response(400, &json!({ "symptoms": "Select at least one" }));
        assert_eq!(err.user_message("Prediction failed"), "Select at least one");
    }

    #[test]
    fn non_object_body_uses_default_message() {
        let err = ApiError::from_response(502, &Value::Null);
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.user_message("Failed to load history"), "Failed to load history");
    }

    #[test]
    fn detail_is_treated_as_general_message() {
        let err = ApiError::from_response(403, &json!({ "detail": "Not allowed" }));
        assert_eq!(err.user_message("x"), "Not allowed");
    }
}

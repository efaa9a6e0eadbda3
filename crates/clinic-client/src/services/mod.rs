//! REST wrappers, one per domain.
//!
//! Services build the request, call through the shared [`ApiClient`] and
//! normalize the payload shape. They never retry and never recover errors.

pub mod auth;
pub mod chat;
pub mod followups;
pub mod medications;
pub mod symptoms;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub use auth::AuthService;
pub use chat::ChatService;
pub use followups::FollowUpService;
pub use medications::MedicationService;
pub use symptoms::SymptomService;

/// Read a list payload that is either a bare array or an object wrapping
/// the array under `field`. Any other shape yields an empty list.
pub fn normalize_list<T: DeserializeOwned>(payload: Value, field: &str) -> Result<Vec<T>, ApiError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(field) {
            Some(Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    serde_json::from_value(Value::Array(items)).map_err(ApiError::decode)
}

/// Read a single entity that may arrive wrapped under `field`.
pub fn unwrap_entity<T: DeserializeOwned>(payload: Value, field: &str) -> Result<T, ApiError> {
    let entity = match payload {
        Value::Object(mut map) if map.contains_key(field) => map.remove(field).unwrap_or_default(),
        other => other,
    };

    serde_json::from_value(entity).map_err(ApiError::decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_lists_are_equivalent() {
        let bare: Vec<String> = normalize_list(json!(["a", "b"]), "symptoms").unwrap();
        let wrapped: Vec<String> =
            normalize_list(json!({ "count": 2, "symptoms": ["a", "b"] }), "symptoms").unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn other_shapes_are_empty() {
        for payload in [
            json!({ "items": ["a"] }),
            json!({ "symptoms": "a" }),
            json!("a"),
            json!(3),
            Value::Null,
        ] {
            let list: Vec<String> = normalize_list(payload, "symptoms").unwrap();
            assert!(list.is_empty());
        }
    }

    #[test]
    fn malformed_items_are_a_decode_error() {
        let result: Result<Vec<u32>, _> = normalize_list(json!(["x"]), "n");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn entity_is_unwrapped_only_when_wrapped() {
        let wrapped: u32 = unwrap_entity(json!({ "followup": 7, "message": "ok" }), "followup").unwrap();
        let bare: String = unwrap_entity(json!("plain"), "followup").unwrap();
        assert_eq!(wrapped, 7);
        assert_eq!(bare, "plain");
    }
}

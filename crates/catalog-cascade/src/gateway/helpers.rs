//! Pure helpers: query building and body decoding (no HTTP, no status logic).

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CascadeError, CascadeResult};
use crate::params::FetchParams;
use crate::types::EntityKind;

/// Query parameter the parent scope is sent as, per entity type.
pub(crate) fn scope_param(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::GradeLevel => None,
        EntityKind::Subject | EntityKind::Class => Some("grade_level_id"),
        EntityKind::LearningUnit => Some("subject_id"),
    }
}

/// Build query pairs for a fetch.
///
/// Scope comes first, then the filters in key order. A grade-level fetch has
/// no parent, so its scope is dropped.
pub(crate) fn query_pairs(kind: EntityKind, params: &FetchParams) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.filters.len() + 1);
    if let (Some(name), Some(scope)) = (scope_param(kind), params.scope.as_ref()) {
        pairs.push((name.to_string(), scope.to_string()));
    }
    pairs.extend(
        params
            .filters
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    pairs
}

/// Decode a list response.
///
/// Accepted shapes:
/// - `{"success": true, "data": [...]}` (`success` may be omitted)
/// - `{"success": false, "message": "..."}` => transport error
/// - a bare JSON array
pub(crate) fn parse_list_body<T: DeserializeOwned>(
    kind: EntityKind,
    body: &str,
) -> CascadeResult<Vec<T>> {
    let value: Value = serde_json::from_str(body).map_err(|e| CascadeError::InvalidResponse {
        message: format!("{} response is not JSON: {}", kind, e),
    })?;

    let data = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut obj) => {
            let success = obj.get("success").and_then(Value::as_bool).unwrap_or(true);
            if !success {
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request failed")
                    .to_string();
                return Err(CascadeError::transport(kind, message));
            }
            obj.remove("data")
                .ok_or_else(|| CascadeError::InvalidResponse {
                    message: format!("{} response has no data field", kind),
                })?
        }
        _ => {
            return Err(CascadeError::InvalidResponse {
                message: format!("{} response is neither an object nor an array", kind),
            })
        }
    };

    serde_json::from_value(data).map_err(|e| CascadeError::InvalidResponse {
        message: format!("failed to decode {} list: {}", kind, e),
    })
}

/// Pull a human-readable message out of an error body.
///
/// Expected format: `{"message": "..."}`. Falls back to the first 200
/// characters of the raw body.
pub(crate) fn error_message(body: &str) -> Option<String> {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(msg) = json.get("message").and_then(Value::as_str) {
            return Some(msg.to_string());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(200).collect())
    }
}

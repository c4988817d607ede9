// ABOUTME: Boundary translation from loosely typed input to typed requests
// ABOUTME: Reconciles friendly and storage-suffixed field names, then deserializes once

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use taskdeck_core::parse_int;

use crate::error::{ServiceError, ServiceResult};

/// A pair of names for one logical attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAlias {
    /// Name used by typed inputs (`projectId`)
    pub friendly: &'static str,
    /// Name used by the remote schema (`project_id_c`)
    pub storage: &'static str,
}

impl FieldAlias {
    pub const fn new(friendly: &'static str, storage: &'static str) -> Self {
        Self { friendly, storage }
    }
}

/// `null` and `""` count as not supplied
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Rewrite storage-suffixed keys to their friendly names.
///
/// When both spellings are present the storage one wins, unless it is
/// blank. A blank value in either slot is dropped so the entity default
/// applies. Keys that are not listed in `aliases` pass through untouched.
pub fn reconcile(mut input: Map<String, Value>, aliases: &[FieldAlias]) -> Map<String, Value> {
    for alias in aliases {
        if input.get(alias.friendly).is_some_and(is_blank) {
            input.remove(alias.friendly);
        }
        match input.remove(alias.storage) {
            Some(value) if !is_blank(&value) => {
                input.insert(alias.friendly.to_string(), value);
            }
            _ => {}
        }
    }
    input
}

/// Translate caller input in either naming convention into a typed request
pub fn from_legacy<T: DeserializeOwned>(input: Value, aliases: &[FieldAlias]) -> ServiceResult<T> {
    let map = match input {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ServiceError::invalid_input(format!(
                "expected an object, got {}",
                other
            )))
        }
    };

    serde_json::from_value(Value::Object(reconcile(map, aliases)))
        .map_err(|e| ServiceError::invalid_input(e.to_string()))
}

/// Coerce a caller-supplied identifier (`7`, `"7"`, `7.0`) to an integer
pub fn record_id(value: &Value) -> ServiceResult<i64> {
    parse_int(value)
        .ok_or_else(|| ServiceError::invalid_input(format!("{} is not a valid record id", value)))
}

/// Parse an identifier typed on a command line or in a URL segment
pub fn record_id_str(value: &str) -> ServiceResult<i64> {
    record_id(&Value::String(value.to_string()))
}

//! List envelope normalization.
//!
//! The upstream returns lists either bare (`[...]`) or wrapped in an object
//! keyed by the resource name (`{"routes": [...]}`). Callers always receive
//! the bare list. Any other shape is rejected rather than guessed at.

use serde_json::Value;
use thiserror::Error;

use crate::routing::ResourceKind;

/// Shape violations found while unwrapping a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("expected a list of {kind}, found {found}")]
    NotAList { kind: ResourceKind, found: &'static str },

    #[error("{kind}[{index}] is {found}, expected an object")]
    NotAnObject {
        kind: ResourceKind,
        index: usize,
        found: &'static str,
    },
}

/// Unwrap `body` into a list of objects for `kind`.
pub fn normalize(kind: ResourceKind, body: Value) -> Result<Vec<Value>, EnvelopeError> {
    let unwrapped = match (body, kind.envelope_key()) {
        (Value::Object(mut map), Some(key)) if map.contains_key(key) => {
            map.remove(key).unwrap_or(Value::Null)
        }
        (other, _) => other,
    };

    let items = match unwrapped {
        Value::Array(items) => items,
        other => {
            return Err(EnvelopeError::NotAList {
                kind,
                found: type_name(&other),
            })
        }
    };

    if let Some((index, item)) = items.iter().enumerate().find(|(_, v)| !v.is_object()) {
        return Err(EnvelopeError::NotAnObject {
            kind,
            index,
            found: type_name(item),
        });
    }

    Ok(items)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

//! Validating extraction from parsed JSON.
//!
//! Every resolver reads raw `serde_json::Value` trees through these helpers
//! so that merge algorithms only ever see already-checked shapes. A value of
//! the wrong shape yields `Err(SkipReason)` and the caller drops it.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::{SkipReason, json_type_name};
use crate::types::{ConfigFile, ConfigFileKind};

pub type Extract<T> = Result<T, SkipReason>;

pub type JsonObject = Map<String, Value>;

pub fn as_object(value: &Value) -> Extract<&JsonObject> {
    value.as_object().ok_or(SkipReason::WrongShape {
        expected: "object",
        found: json_type_name(value),
    })
}

pub fn as_array(value: &Value) -> Extract<&Vec<Value>> {
    value.as_array().ok_or(SkipReason::WrongShape {
        expected: "array",
        found: json_type_name(value),
    })
}

pub fn as_str(value: &Value) -> Extract<&str> {
    value.as_str().ok_or(SkipReason::WrongShape {
        expected: "string",
        found: json_type_name(value),
    })
}

/// Looks up `key` in an object and checks it is itself an object.
pub fn object_field<'a>(object: &'a JsonObject, key: &str) -> Extract<&'a JsonObject> {
    let value = object
        .get(key)
        .ok_or_else(|| SkipReason::Absent(key.to_string()))?;
    as_object(value)
}

/// Optional string field; absent and non-string values both give `None`.
pub fn optional_str(object: &JsonObject, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// String items of an array; anything else is skipped.
pub fn string_items(value: &Value) -> Vec<String> {
    let Ok(items) = as_array(value) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match as_str(item) {
            Ok(s) => Some(s.to_string()),
            Err(reason) => {
                tracing::debug!(%reason, "skipping non-string array item");
                None
            }
        })
        .collect()
}

/// String-valued entries of an object; anything else is skipped.
pub fn string_map(value: &Value) -> BTreeMap<String, String> {
    let Ok(object) = as_object(value) else {
        return BTreeMap::new();
    };
    object
        .iter()
        .filter_map(|(key, item)| match as_str(item) {
            Ok(s) => Some((key.clone(), s.to_string())),
            Err(reason) => {
                tracing::debug!(key = %key, %reason, "skipping non-string map entry");
                None
            }
        })
        .collect()
}

/// Object content of a usable file.
pub fn object_content(file: &ConfigFile) -> Extract<&JsonObject> {
    usable(file)?;
    as_object(&file.content)
}

/// String content of a usable file.
pub fn text_content(file: &ConfigFile) -> Extract<&str> {
    usable(file)?;
    as_str(&file.content)
}

fn usable(file: &ConfigFile) -> Extract<()> {
    if !file.exists {
        return Err(SkipReason::Missing);
    }
    if !file.readable || file.error.is_some() {
        return Err(SkipReason::Unreadable(
            file.error.clone().unwrap_or_else(|| "permission denied".into()),
        ));
    }
    Ok(())
}

/// Usable files of `kind` paired with their object content, in input order.
pub fn objects_of_kind(
    files: &[ConfigFile],
    kind: ConfigFileKind,
) -> impl Iterator<Item = (&ConfigFile, &JsonObject)> {
    files
        .iter()
        .filter(move |file| file.kind == kind)
        .filter_map(|file| match object_content(file) {
            Ok(object) => Some((file, object)),
            Err(reason) => {
                tracing::debug!(
                    path = %file.expected_path.display(),
                    %reason,
                    "skipping config file"
                );
                None
            }
        })
}

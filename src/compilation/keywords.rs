//! Typed keyword extraction from a schema object.
//!
//! Each getter looks a keyword up in the JSON map, validates its shape and
//! converts it to the compiled representation. Absence is `Ok(None)`; a
//! present keyword with the wrong JSON type is a `KeywordType` error, and a
//! present keyword violating a value constraint (empty array, duplicate
//! entries, non-positive number, invalid regex) is a `KeywordPrep` error.

use crate::error::{SchemaError, SchemaErrorKind};
use crate::helpers::{is_unique, json_type_name};
use crate::numbers::SchemaNumber;
use crate::value::SchemaPattern;
use fancy_regex::Regex;
use serde_json::{Map, Value};

pub(crate) fn type_error(key: &str, expected: &str, value: &Value) -> SchemaError {
    SchemaError::new(
        SchemaErrorKind::KeywordType,
        format!(
            "Invalid type for {} - expected {} but given {}",
            key,
            expected,
            json_type_name(value)
        ),
    )
}

pub(crate) fn get_bool(map: &Map<String, Value>, key: &str) -> Result<Option<bool>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(type_error(key, "boolean", other)),
    }
}

pub(crate) fn get_string(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<String>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(type_error(key, "string", other)),
    }
}

/// Non-negative integer keywords (`minLength`, `maxItems`, ...).
pub(crate) fn get_u64(map: &Map<String, Value>, key: &str) -> Result<Option<u64>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(value @ Value::Number(number)) => match number.as_u64() {
            Some(unsigned) => Ok(Some(unsigned)),
            None => Err(type_error(key, "unsigned integer", value)),
        },
        Some(other) => Err(type_error(key, "unsigned integer", other)),
    }
}

pub(crate) fn get_number(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<SchemaNumber>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Number(number)) => Ok(Some(SchemaNumber::from_json(number))),
        Some(other) => Err(type_error(key, "number", other)),
    }
}

/// `multipleOf`: a number that must be strictly positive.
pub(crate) fn get_positive_number(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<SchemaNumber>, SchemaError> {
    match get_number(map, key)? {
        None => Ok(None),
        Some(number) if number.is_positive() => Ok(Some(number)),
        Some(number) => Err(SchemaError::new(
            SchemaErrorKind::KeywordPrep,
            format!("The {} value {} must be greater than zero", key, number),
        )),
    }
}

/// `enum`: an array of unique values.
pub(crate) fn get_unique_array(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<Value>>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) => {
            if !is_unique(items) {
                return Err(SchemaError::new(
                    SchemaErrorKind::KeywordPrep,
                    format!("The {} values must be unique", key),
                ));
            }
            Ok(Some(items.clone()))
        }
        Some(other) => Err(type_error(key, "array", other)),
    }
}

/// `required` and the string-array form shared with `type` arrays: unique,
/// strings only.
pub(crate) fn get_unique_string_array(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<Vec<String>>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(unique_string_array(key, items)?)),
        Some(other) => Err(type_error(key, "array", other)),
    }
}

pub(crate) fn unique_string_array(key: &str, items: &[Value]) -> Result<Vec<String>, SchemaError> {
    let mut strings = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(value) => strings.push(value.clone()),
            other => return Err(type_error(key, "array of strings", other)),
        }
    }
    if !is_unique(items) {
        return Err(SchemaError::new(
            SchemaErrorKind::KeywordPrep,
            format!("The {} values must be unique", key),
        ));
    }
    Ok(strings)
}

/// `pattern`: an ECMA regex compiled at schema-compile time.
pub(crate) fn get_regex(
    map: &Map<String, Value>,
    key: &str,
) -> Result<Option<SchemaPattern>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(pattern)) => Ok(Some(compile_regex(key, pattern)?)),
        Some(other) => Err(type_error(key, "string", other)),
    }
}

pub(crate) fn compile_regex(key: &str, pattern: &str) -> Result<SchemaPattern, SchemaError> {
    let regex = Regex::new(pattern).map_err(|error| {
        SchemaError::new(
            SchemaErrorKind::KeywordPrep,
            format!("Invalid regular expression in {}: {}", key, error),
        )
    })?;
    Ok(SchemaPattern {
        original: pattern.to_owned(),
        regex,
    })
}

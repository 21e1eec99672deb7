//! String kind validator. Lengths are counted in unicode code points, not
//! bytes; patterns are the schema-compiled ECMA regexes.

use super::stream::ValidationStream;
use super::{invalid_keyword, value_type_error};
use crate::error::ValidationResult;
use crate::helpers::json_type_name;
use serde_json::Value;

pub(crate) fn string_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    match instance {
        Value::String(instance_str) => string_value_str(stream, index, instance_str),
        other => value_type_error(stream, index, "string", json_type_name(other)),
    }
}

/// Validate a bare string against the frame's string schema. Also used for
/// object keys under `propertyNames`.
pub(crate) fn string_value_str(
    stream: &mut ValidationStream,
    index: usize,
    instance_str: &str,
) -> ValidationResult {
    let schema = super::schema_at(stream, index);
    let string = schema.string();
    let length = bytecount::num_chars(instance_str.as_bytes()) as u64;

    if let Some(min_length) = string.min_length {
        if length < min_length {
            return invalid_keyword(
                stream,
                index,
                format!(
                    "String length {} is lower than minimum length {}",
                    length, min_length
                ),
            );
        }
    }

    if let Some(max_length) = string.max_length {
        if length > max_length {
            return invalid_keyword(
                stream,
                index,
                format!(
                    "String length {} is greater than maximum length {}",
                    length, max_length
                ),
            );
        }
    }

    if let Some(pattern) = &string.pattern {
        if !pattern.is_match(instance_str) {
            return invalid_keyword(
                stream,
                index,
                format!(
                    "String pattern {} does not match value {}",
                    pattern.original, instance_str
                ),
            );
        }
    }

    ValidationResult::Valid
}

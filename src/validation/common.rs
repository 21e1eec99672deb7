//! Checks shared by every schema kind, run before the kind-specific
//! validator: applicator finalisation (`anyOf`, `oneOf`, the `type_list`
//! latch) and the value equality keywords (`enum`, `const`).

use super::stream::ValidationStream;
use super::{invalid_composition, invalid_keyword, invalid_type};
use crate::error::ValidationResult;
use crate::helpers::equal;
use serde_json::Value;

pub(crate) fn common_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    let value = super::schema_at(stream, index);

    if value.common.any_of.is_some() {
        if !stream.stack.position(index).any_of_valid {
            return invalid_composition(
                stream,
                index,
                "No anyOf subschema was valid".to_string(),
            );
        }
        stream.error = None;
    }

    if value.common.one_of.is_some() {
        if !stream.stack.position(index).one_of_valid {
            return invalid_composition(
                stream,
                index,
                "No oneOf subschema was valid".to_string(),
            );
        }
        stream.error = None;
    }

    if value.common.type_list.is_some() {
        if !stream.stack.position(index).type_valid {
            return invalid_type(
                stream,
                index,
                "Value is not any of the listed types".to_string(),
            );
        }
        stream.error = None;
    }

    if let Some(branches) = &value.common.type_any {
        if !branches.is_empty() {
            if !stream.stack.position(index).type_valid {
                return invalid_type(
                    stream,
                    index,
                    "Value does not match any constrained type".to_string(),
                );
            }
            stream.error = None;
        }
    }

    if let Some(enum_values) = &value.common.enum_values {
        if !enum_values.iter().any(|item| equal(instance, item)) {
            return invalid_keyword(
                stream,
                index,
                "Instance value not found in enum values".to_string(),
            );
        }
    }

    if let Some(const_value) = &value.common.const_value {
        if !equal(instance, const_value) {
            return invalid_keyword(
                stream,
                index,
                "Instance value is not equal to const value".to_string(),
            );
        }
    }

    ValidationResult::Valid
}

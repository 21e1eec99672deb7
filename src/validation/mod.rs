//! The streaming validator: the layered frame stack, applicator composition,
//! result propagation and the per-kind instance checks.

pub(crate) mod array;
pub(crate) mod common;
pub(crate) mod composition;
pub(crate) mod object;
pub(crate) mod result;
pub(crate) mod scalar;
pub(crate) mod stack;
pub(crate) mod stream;
pub(crate) mod string;

use crate::error::{InvalidReason, SchemaError, SchemaErrorKind, ValidationResult};
use crate::value::SchemaKind;
use serde_json::Value;
use stack::Composition;
use std::sync::Arc;
use stream::ValidationStream;

pub(crate) fn invalid_keyword(
    stream: &mut ValidationStream,
    index: usize,
    message: String,
) -> ValidationResult {
    stream.error = Some(SchemaError::new(SchemaErrorKind::ValidationKeyword, message));
    stream.stack.position_mut(index).invalid_reason = InvalidReason::Keyword;
    ValidationResult::Invalid
}

pub(crate) fn invalid_type(
    stream: &mut ValidationStream,
    index: usize,
    message: String,
) -> ValidationResult {
    stream.error = Some(SchemaError::new(SchemaErrorKind::ValidationType, message));
    stream.stack.position_mut(index).invalid_reason = InvalidReason::Type;
    ValidationResult::Invalid
}

pub(crate) fn invalid_composition(
    stream: &mut ValidationStream,
    index: usize,
    message: String,
) -> ValidationResult {
    stream.error = Some(SchemaError::new(
        SchemaErrorKind::ValidationComposition,
        message,
    ));
    stream.stack.position_mut(index).invalid_reason = InvalidReason::Composition;
    ValidationResult::Invalid
}

pub(crate) fn value_type_error(
    stream: &mut ValidationStream,
    index: usize,
    expected: &str,
    actual: &str,
) -> ValidationResult {
    invalid_type(
        stream,
        index,
        format!("Invalid type - expected {} but given {}", expected, actual),
    )
}

/// Whether the frame may be skipped during a reverse validation pass: its
/// result is already fixed, it went invalid earlier, or it is an `anyOf`
/// branch whose parent is already satisfied.
pub(crate) fn skip_in_reverse_pass(stream: &ValidationStream, index: usize) -> bool {
    let position = stream.stack.position(index);
    if position.is_final || position.result != ValidationResult::Valid {
        return true;
    }
    position.composition() == Some(Composition::Any)
        && position
            .parent
            .map_or(false, |parent| stream.stack.position(parent).any_of_valid)
}

/// Run the common checks and then the kind-specific validator for one frame
/// against `instance`. Fatal conditions (an unresolvable reference inside a
/// `contains` composition) surface as `Err`.
pub(crate) fn validate_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> Result<ValidationResult, SchemaError> {
    let result = common::common_value(stream, index, instance);
    if result != ValidationResult::Valid {
        return Ok(result);
    }

    let kind = stream.stack.position(index).schema().kind();
    let result = match kind {
        SchemaKind::Mixed => ValidationResult::Valid,
        SchemaKind::BooleanSchema => {
            let accepts = stream.stack.position(index).schema().boolean_true;
            if accepts {
                ValidationResult::Valid
            } else {
                invalid_keyword(
                    stream,
                    index,
                    "No value is valid against the false schema".to_string(),
                )
            }
        }
        SchemaKind::Null => scalar::null_value(stream, index, instance),
        SchemaKind::Boolean => scalar::boolean_value(stream, index, instance),
        SchemaKind::Integer => scalar::integer_value(stream, index, instance),
        SchemaKind::Number => scalar::number_value(stream, index, instance),
        SchemaKind::String => string::string_value(stream, index, instance),
        SchemaKind::Array => array::array_value(stream, index, instance)?,
        SchemaKind::Object => object::object_value(stream, index, instance),
    };
    Ok(result)
}

/// Shared helper for cloning a frame's schema handle out of the stack so the
/// stack can be mutated while the schema is read.
pub(crate) fn schema_at(
    stream: &ValidationStream,
    index: usize,
) -> Arc<crate::value::SchemaValue> {
    Arc::clone(stream.stack.position(index).schema())
}

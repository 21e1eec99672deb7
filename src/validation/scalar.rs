//! Validators for the null, boolean, integer and number kinds.

use super::stream::ValidationStream;
use super::{invalid_keyword, invalid_type, value_type_error};
use crate::error::ValidationResult;
use crate::helpers::json_type_name;
use crate::numbers::SchemaNumber;
use crate::schemas::Draft;
use crate::value::ExclusiveBound;
use serde_json::Value;

pub(crate) fn null_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    if !instance.is_null() {
        return value_type_error(stream, index, "null", json_type_name(instance));
    }
    ValidationResult::Valid
}

pub(crate) fn boolean_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    if !instance.is_boolean() {
        return value_type_error(stream, index, "boolean", json_type_name(instance));
    }
    ValidationResult::Valid
}

pub(crate) fn integer_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    let number = match instance {
        Value::Number(number) => {
            if let Some(int_value) = number.as_i64() {
                SchemaNumber::Int(int_value)
            } else {
                let double = number.as_f64().unwrap_or(f64::NAN);
                if double.fract() != 0.0 {
                    return invalid_type(
                        stream,
                        index,
                        "Double integer type cannot have decimal point".to_string(),
                    );
                }
                SchemaNumber::Float(double)
            }
        }
        other => {
            return value_type_error(stream, index, "integer or double", json_type_name(other))
        }
    };

    check_bounds(stream, index, number)
}

pub(crate) fn number_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    let number = match instance {
        Value::Number(number) => SchemaNumber::from_json(number),
        other => {
            return value_type_error(stream, index, "integer or double", json_type_name(other))
        }
    };

    check_bounds(stream, index, number)
}

/// Draft-sensitive bound checks shared by the integer and number kinds. From
/// draft 6 on the exclusive bounds are standalone numeric limits; draft 4
/// treats them as strictness flags on `minimum` / `maximum`.
fn check_bounds(
    stream: &mut ValidationStream,
    index: usize,
    number: SchemaNumber,
) -> ValidationResult {
    let schema = super::schema_at(stream, index);
    let numeric = schema.numeric();

    if stream.schema.draft() >= Draft::Draft6 {
        if let Some(minimum) = numeric.minimum {
            if number.lt(minimum) {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is lower than minimum value {}", number, minimum),
                );
            }
        }
        if let Some(ExclusiveBound::Limit(bound)) = numeric.exclusive_minimum {
            if number.le(bound) {
                return invalid_keyword(
                    stream,
                    index,
                    format!(
                        "Value {} is {} exclusive minimum value {}",
                        number,
                        if number.eq(bound) { "equal to" } else { "lower than" },
                        bound
                    ),
                );
            }
        }
        if let Some(maximum) = numeric.maximum {
            if number.gt(maximum) {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is greater than maximum value {}", number, maximum),
                );
            }
        }
        if let Some(ExclusiveBound::Limit(bound)) = numeric.exclusive_maximum {
            if number.ge(bound) {
                return invalid_keyword(
                    stream,
                    index,
                    format!(
                        "Value {} is {} exclusive maximum value {}",
                        number,
                        if number.eq(bound) { "equal to" } else { "greater than" },
                        bound
                    ),
                );
            }
        }
    } else {
        // Draft 4
        if let Some(minimum) = numeric.minimum {
            if number.lt(minimum) {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is lower than minimum value {}", number, minimum),
                );
            }
            if matches!(numeric.exclusive_minimum, Some(ExclusiveBound::Flag(true)))
                && number.eq(minimum)
            {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is equal to exclusive minimum", number),
                );
            }
        }
        if let Some(maximum) = numeric.maximum {
            if number.gt(maximum) {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is greater than maximum value {}", number, maximum),
                );
            }
            if matches!(numeric.exclusive_maximum, Some(ExclusiveBound::Flag(true)))
                && number.eq(maximum)
            {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Value {} is equal to exclusive maximum", number),
                );
            }
        }
    }

    if let Some(factor) = numeric.multiple_of {
        if !number.is_multiple_of(factor) {
            return invalid_keyword(
                stream,
                index,
                format!("Value {} is not a multiple of {}", number, factor),
            );
        }
    }

    ValidationResult::Valid
}

//! Array kind validation: per-item schema selection under `items` /
//! `additionalItems`, the count-driven `maxItems` gate and the final array
//! checks including the layered `contains` evaluation.

use super::stream::ValidationStream;
use super::{composition, invalid_keyword, result, value_type_error};
use crate::error::{SchemaError, ValidationResult};
use crate::helpers::{is_unique, json_type_name};
use crate::value::{ArraySchema, BoolOrSchema, Items, SchemaValue};
use serde_json::Value;
use std::sync::Arc;

/// The schema constraining the item at `item_index`, if any.
fn find_item(array: &ArraySchema, item_index: usize) -> Option<Arc<SchemaValue>> {
    match array.items.as_ref()? {
        Items::Single(sub) => Some(Arc::clone(sub)),
        Items::List(list) => list.get(item_index).map(Arc::clone),
    }
}

/// Push the schema for the first item when the array opens.
pub(crate) fn array_start_position(
    stream: &mut ValidationStream,
    index: usize,
) -> Result<ValidationResult, SchemaError> {
    if stream.stack.position(index).is_final {
        return Ok(ValidationResult::Valid);
    }
    let schema = super::schema_at(stream, index);
    let array = schema.array();

    if let Some(item) = find_item(array, stream.stack.position(index).count) {
        stream.stack.push_basic(item, Some(index));
    } else if let Some(BoolOrSchema::Schema(sub)) = &array.additional_items {
        stream.stack.push_basic(Arc::clone(sub), Some(index));
    }

    Ok(ValidationResult::Valid)
}

/// Handle one `array_append` event for an array-kind frame: enforce
/// `maxItems` against the running count and push the schema for the next
/// item. With a `false` `additionalItems`, the append following an item that
/// fell beyond the `items` list flags the overflow.
pub(crate) fn array_append_position(
    stream: &mut ValidationStream,
    index: usize,
) -> Result<ValidationResult, SchemaError> {
    if stream.stack.position(index).is_final {
        return Ok(ValidationResult::Valid);
    }
    let schema = super::schema_at(stream, index);
    let array = schema.array();
    let count = stream.stack.position(index).count;

    if let Some(max_items) = array.max_items {
        if count as u64 > max_items {
            stream
                .stack
                .position_mut(index)
                .set_final(ValidationResult::Invalid);
            return Ok(invalid_keyword(
                stream,
                index,
                format!(
                    "Array number of items is {} which is greater than maximum number of items {}",
                    count, max_items
                ),
            ));
        }
    }

    if let Some(item) = find_item(array, count) {
        stream.stack.push_basic(item, Some(index));
        return Ok(ValidationResult::Valid);
    }
    match &array.additional_items {
        Some(BoolOrSchema::Schema(sub)) => {
            stream.stack.push_basic(Arc::clone(sub), Some(index));
        }
        Some(BoolOrSchema::Boolean(false)) => {
            if let Some(Items::List(list)) = &array.items {
                if count > 0 && count - 1 >= list.len() {
                    stream
                        .stack
                        .position_mut(index)
                        .set_final(ValidationResult::Invalid);
                    return Ok(invalid_keyword(
                        stream,
                        index,
                        "Array additional items are not allowed and the number of items is greater"
                            .to_string(),
                    ));
                }
            }
        }
        Some(BoolOrSchema::Boolean(true)) | None => {}
    }

    Ok(ValidationResult::Valid)
}

/// Final array checks run at the `value` event: `minItems`, `uniqueItems`
/// and `contains`.
pub(crate) fn array_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> Result<ValidationResult, SchemaError> {
    let items = match instance.as_array() {
        Some(items) => items,
        None => {
            return Ok(value_type_error(
                stream,
                index,
                "array",
                json_type_name(instance),
            ))
        }
    };
    let schema = super::schema_at(stream, index);
    let array = schema.array();

    if let Some(min_items) = array.min_items {
        if (items.len() as u64) < min_items {
            return Ok(invalid_keyword(
                stream,
                index,
                format!(
                    "Array number of items is {} which is lower than minimum number of items {}",
                    items.len(),
                    min_items
                ),
            ));
        }
    }

    if array.unique_items == Some(true) && !is_unique(items) {
        return Ok(invalid_keyword(
            stream,
            index,
            "Array items are not unique".to_string(),
        ));
    }

    if let Some(contains) = &array.contains {
        if !contains_matches(stream, contains, items)? {
            return Ok(invalid_keyword(
                stream,
                index,
                "Array does not contain an item that validates against the contains schema"
                    .to_string(),
            ));
        }
    }

    Ok(ValidationResult::Valid)
}

/// Evaluate the `contains` schema against each item inside a speculative
/// layer, resetting the layer between candidates. The top frame is pushed
/// without a parent so that failed candidates cannot leak into the array
/// frame; the caller turns the aggregate answer into the final result.
fn contains_matches(
    stream: &mut ValidationStream,
    contains: &Arc<SchemaValue>,
    items: &[Value],
) -> Result<bool, SchemaError> {
    stream.stack.push_separator();
    let top = stream.stack.push_basic(Arc::clone(contains), None);

    let mut iterator = stream.stack.layer_iterator();
    while let Some(frame) = iterator.next(&stream.stack) {
        composition::composition_check(stream, frame)?;
    }

    let mut matched = false;
    let mut first_item = true;
    for item in items {
        if first_item {
            first_item = false;
        } else {
            stream.stack.layer_reset_positions();
        }

        let mut reverse = stream.stack.layer_reverse_iterator();
        while let Some(frame) = reverse.next(&stream.stack) {
            if super::skip_in_reverse_pass(stream, frame) {
                continue;
            }
            let outcome = super::validate_value(stream, frame, item)?;
            stream.stack.position_mut(frame).result = outcome;
            if outcome == ValidationResult::Error {
                return Err(stream.fatal_error());
            }
            result::propagate(stream, frame);
        }

        if stream.stack.position(top).result == ValidationResult::Valid {
            stream.error = None;
            matched = true;
            break;
        }
    }

    stream.stack.layer_remove();
    Ok(matched)
}

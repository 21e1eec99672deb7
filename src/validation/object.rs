//! Object kind validation: key-driven schema pushes (`properties`,
//! `patternProperties`, `additionalProperties`, `propertyNames`), the
//! dependencies pre-value step and the final object checks.

use super::stream::ValidationStream;
use super::{composition, invalid_keyword, result, string, value_type_error};
use crate::error::{SchemaError, ValidationResult};
use crate::helpers::json_type_name;
use crate::value::{BoolOrSchema, Dependency, SchemaKind};
use serde_json::Value;
use std::sync::Arc;

/// Handle one `object_key` event for an object-kind frame: count-driven
/// `maxProperties`, the speculative `propertyNames` layer and the property
/// schema pushes for the upcoming member value.
pub(crate) fn object_key_position(
    stream: &mut ValidationStream,
    index: usize,
    key: &str,
) -> Result<ValidationResult, SchemaError> {
    if stream.stack.position(index).is_final {
        return Ok(ValidationResult::Valid);
    }

    let schema = super::schema_at(stream, index);
    let object = schema.object();

    if let Some(max_properties) = object.max_properties {
        let count = stream.stack.position(index).count;
        if count as u64 > max_properties {
            stream
                .stack
                .position_mut(index)
                .set_final(ValidationResult::Invalid);
            return Ok(invalid_keyword(
                stream,
                index,
                format!(
                    "Object number of properties is {} which is greater than maximum number of properties {}",
                    count, max_properties
                ),
            ));
        }
    }

    if let Some(property_names) = &object.property_names {
        let names_invalid = validate_property_name(stream, index, property_names, key)?;
        if names_invalid {
            stream
                .stack
                .position_mut(index)
                .set_final(ValidationResult::Invalid);
            return Ok(invalid_keyword(
                stream,
                index,
                format!(
                    "Object key {} does not validate against propertyNames schema",
                    key
                ),
            ));
        }
    }

    let mut found = false;

    if let Some(properties) = &object.properties {
        if let Some(sub) = properties.get(key) {
            stream.stack.push_basic(Arc::clone(sub), Some(index));
            found = true;
        }
    }

    if let Some(pattern_properties) = &object.pattern_properties {
        for sub in pattern_properties {
            let pattern = sub
                .pattern
                .as_ref()
                .expect("pattern properties carry a compiled regex");
            if pattern.is_match(key) {
                stream.stack.push_basic(Arc::clone(sub), Some(index));
                found = true;
            }
        }
    }

    if !found {
        match &object.additional_properties {
            Some(BoolOrSchema::Schema(sub)) => {
                stream.stack.push_basic(Arc::clone(sub), Some(index));
            }
            Some(BoolOrSchema::Boolean(false)) => {
                stream
                    .stack
                    .position_mut(index)
                    .set_final(ValidationResult::Invalid);
                return Ok(invalid_keyword(
                    stream,
                    index,
                    format!(
                        "Object does not allow additional properties but added property with key {} which is not found in properties and does not match any pattern property",
                        key
                    ),
                ));
            }
            Some(BoolOrSchema::Boolean(true)) | None => {}
        }
    }

    Ok(ValidationResult::Valid)
}

/// Evaluate the `propertyNames` schema against `key` inside its own
/// speculative layer; the layer is removed before returning.
fn validate_property_name(
    stream: &mut ValidationStream,
    index: usize,
    property_names: &Arc<crate::value::SchemaValue>,
    key: &str,
) -> Result<bool, SchemaError> {
    stream.stack.push_separator();
    let top = stream
        .stack
        .push_basic(Arc::clone(property_names), Some(index));

    let mut iterator = stream.stack.layer_iterator();
    while let Some(frame) = iterator.next(&stream.stack) {
        composition::composition_check(stream, frame)?;
    }

    let mut reverse = stream.stack.layer_reverse_iterator();
    while let Some(frame) = reverse.next(&stream.stack) {
        if !super::skip_in_reverse_pass(stream, frame) {
            if stream.stack.position(frame).schema().kind() == SchemaKind::String {
                let result = string::string_value_str(stream, frame, key);
                stream.stack.position_mut(frame).result = result;
                if result == ValidationResult::Error {
                    return Err(stream.fatal_error());
                }
            }
            result::propagate(stream, frame);
        }
    }

    let names_invalid = stream.stack.position(top).result != ValidationResult::Valid;
    stream.stack.layer_remove();
    Ok(names_invalid)
}

/// The pre-value step for object instances: push the schema-form
/// `dependencies` whose trigger key is present on the instance. Each pushed
/// frame gets its composition check immediately - the object-start pass is
/// already over for this layer.
pub(crate) fn pre_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> Result<ValidationResult, SchemaError> {
    let instance_map = match instance.as_object() {
        Some(map) => map,
        None => return Ok(ValidationResult::Valid),
    };
    let schema = super::schema_at(stream, index);
    let object = schema.object();

    if let Some(dependencies) = &object.dependencies {
        for (name, dependency) in dependencies {
            if let Dependency::Schema(sub) = dependency {
                stream.stack.mark();
                let frame = stream.stack.push_basic(Arc::clone(sub), Some(index));
                if !instance_map.contains_key(name) {
                    // the trigger key is absent, the dependency does not apply
                    stream.stack.reset_to_mark();
                } else {
                    composition::composition_check(stream, frame)?;
                }
            }
        }
    }

    Ok(ValidationResult::Valid)
}

/// Final object checks run at the `value` event: key-array dependencies,
/// `minProperties` and `required`.
pub(crate) fn object_value(
    stream: &mut ValidationStream,
    index: usize,
    instance: &Value,
) -> ValidationResult {
    let instance_map = match instance.as_object() {
        Some(map) => map,
        None => return value_type_error(stream, index, "object", json_type_name(instance)),
    };
    let schema = super::schema_at(stream, index);
    let object = schema.object();

    if let Some(dependencies) = &object.dependencies {
        for (name, dependency) in dependencies {
            if let Dependency::Keys(keys) = dependency {
                if !instance_map.contains_key(name) {
                    continue;
                }
                for key in keys {
                    if !instance_map.contains_key(key) {
                        return invalid_keyword(
                            stream,
                            index,
                            format!(
                                "Object key {} is required by dependency {} but it is not present",
                                key, name
                            ),
                        );
                    }
                }
            }
        }
    }

    if let Some(min_properties) = object.min_properties {
        if (instance_map.len() as u64) < min_properties {
            return invalid_keyword(
                stream,
                index,
                format!(
                    "Object number of properties is {} which is lower than minimum number of properties {}",
                    instance_map.len(),
                    min_properties
                ),
            );
        }
    }

    if let Some(required) = &object.required {
        for key in required {
            if !instance_map.contains_key(key) {
                return invalid_keyword(
                    stream,
                    index,
                    format!("Object does not have required property with key {}", key),
                );
            }
        }
    }

    ValidationResult::Valid
}

//! The push-driven validation stream.
//!
//! The caller feeds instance events in document order; the stream maintains
//! the layered frame stack and combines sub-schema results as the events
//! arrive. [`crate::Schema::validate`] drives it by recursive descent, but
//! the surface is public so tokeniser-driven callers can emit events
//! directly.

use super::stack::ValidationStack;
use super::{array, composition, object, result, value_type_error};
use crate::compilation::Schema;
use crate::error::{SchemaError, SchemaErrorKind, ValidationResult};
use crate::value::SchemaKind;
use serde_json::Value;
use std::sync::Arc;

/// Streaming validation state for one instance against one compiled schema.
///
/// ```rust
/// # use jsonschema_stream::{Schema, ValidationResult, ValidationStream};
/// # use serde_json::json;
/// let schema = Schema::compile(&json!({
///     "$schema": "http://json-schema.org/draft-06/schema#",
///     "type": "object",
///     "required": ["id"]
/// })).unwrap();
/// let mut stream = ValidationStream::new(&schema, 16);
/// let instance = json!({"id": 1});
/// stream.object_start().unwrap();
/// stream.object_key("id").unwrap();
/// stream.value(&json!(1)).unwrap();
/// stream.object_end().unwrap();
/// stream.value(&instance).unwrap();
/// assert_eq!(stream.final_result(), ValidationResult::Valid);
/// ```
#[derive(Debug)]
pub struct ValidationStream<'schema> {
    pub(crate) schema: &'schema Schema,
    pub(crate) stack: ValidationStack,
    pub(crate) error: Option<SchemaError>,
    initial_capacity: usize,
}

impl<'schema> ValidationStream<'schema> {
    /// Create a stream with the given initial stack capacity (must be at
    /// least 1). The root schema frame is armed immediately.
    #[must_use]
    pub fn new(schema: &'schema Schema, initial_capacity: usize) -> ValidationStream<'schema> {
        let mut stack = ValidationStack::new(initial_capacity);
        stack.push_basic(Arc::clone(schema.root()), None);
        ValidationStream {
            schema,
            stack,
            error: None,
            initial_capacity,
        }
    }

    /// Drop all validation state and re-arm the root frame so another
    /// instance can be validated.
    pub fn clear(&mut self) {
        let mut stack = ValidationStack::new(self.initial_capacity);
        stack.push_basic(Arc::clone(self.schema.root()), None);
        self.stack = stack;
        self.error = None;
    }

    /// The result of the root frame. Meaningful once the events for a whole
    /// instance have been fed.
    #[must_use]
    pub fn final_result(&self) -> ValidationResult {
        self.stack.root_position().result
    }

    /// The most recent unrecovered validation error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&SchemaError> {
        self.error.as_ref()
    }

    pub(crate) fn fatal_error(&self) -> SchemaError {
        self.error
            .clone()
            .unwrap_or_else(|| SchemaError::new(SchemaErrorKind::ValidationKeyword, "Validation stream failure"))
    }

    /// An object instance opens at the current location.
    pub fn object_start(&mut self) -> Result<(), SchemaError> {
        let mut iterator = self.stack.layer_iterator();
        while let Some(index) = iterator.next(&self.stack) {
            let compatible = self
                .stack
                .position(index)
                .schema()
                .is_kind_compatible(SchemaKind::Object);
            if compatible {
                composition::composition_check(self, index)?;
            } else {
                let kind = self.stack.position(index).schema().kind();
                let result = value_type_error(self, index, &kind.to_string(), "object");
                self.stack.position_mut(index).result = result;
            }
        }
        Ok(())
    }

    /// The next object member key. Opens the layer the member value will be
    /// validated in.
    pub fn object_key(&mut self, key: &str) -> Result<(), SchemaError> {
        let mut iterator = self.stack.layer_iterator();
        self.stack.push_separator();
        while let Some(index) = iterator.next(&self.stack) {
            self.stack.position_mut(index).count += 1;
            let applicable = {
                let position = self.stack.position(index);
                position.result == ValidationResult::Valid
                    && position.schema().kind() == SchemaKind::Object
            };
            if applicable {
                let result = object::object_key_position(self, index, key)?;
                self.stack.position_mut(index).result = result;
            }
            self.stack.position_mut(index).object_key = Some(key.to_owned());
        }
        Ok(())
    }

    /// A member value has been attached to the object. Kept as an extension
    /// point; apart from an event-ordering check there is nothing to do.
    pub fn object_update(
        &mut self,
        _object: &Value,
        key: &str,
        _member: &Value,
    ) -> Result<(), SchemaError> {
        if cfg!(debug_assertions) {
            // events must arrive in document order: the update belongs to
            // the most recently announced key
            let mut iterator = self.stack.layer_iterator();
            while let Some(index) = iterator.next(&self.stack) {
                debug_assert_eq!(
                    self.stack.position(index).object_key.as_deref(),
                    Some(key)
                );
            }
        }
        Ok(())
    }

    /// The object instance closed. Kept as an extension point; currently
    /// there is nothing to do.
    pub fn object_end(&mut self) -> Result<(), SchemaError> {
        Ok(())
    }

    /// An array instance opens at the current location.
    pub fn array_start(&mut self) -> Result<(), SchemaError> {
        let mut iterator = self.stack.layer_iterator();
        while let Some(index) = iterator.next(&self.stack) {
            let compatible = self
                .stack
                .position(index)
                .schema()
                .is_kind_compatible(SchemaKind::Array);
            if compatible {
                composition::composition_check(self, index)?;
            } else {
                let kind = self.stack.position(index).schema().kind();
                let result = value_type_error(self, index, &kind.to_string(), "array");
                self.stack.position_mut(index).result = result;
            }
        }

        // Finalise parents of frames that already failed the type check;
        // valid frames propagate after the closing `value` event.
        let mut reverse = self.stack.layer_reverse_iterator();
        while let Some(index) = reverse.next(&self.stack) {
            if self.stack.position(index).result != ValidationResult::Valid {
                result::propagate(self, index);
            }
        }

        // Open the layer for the first item and arm its schema.
        let mut iterator = self.stack.layer_iterator();
        self.stack.push_separator();
        while let Some(index) = iterator.next(&self.stack) {
            let applicable = {
                let position = self.stack.position(index);
                position.result == ValidationResult::Valid
                    && position.schema().kind() == SchemaKind::Array
            };
            if applicable {
                array::array_start_position(self, index)?;
            }
        }
        Ok(())
    }

    /// An item has been attached to the array; arm the schema for the next
    /// one.
    pub fn array_append(&mut self, _array: &Value, _item: &Value) -> Result<(), SchemaError> {
        let mut iterator = self.stack.layer_iterator();
        self.stack.push_separator();
        while let Some(index) = iterator.next(&self.stack) {
            self.stack.position_mut(index).count += 1;
            if self.stack.position(index).schema().kind() == SchemaKind::Array {
                let result = array::array_append_position(self, index)?;
                if result != ValidationResult::Valid {
                    result::propagate(self, index);
                }
            }
        }
        Ok(())
    }

    /// The array instance closed; drop the layer armed by the last append.
    pub fn array_end(&mut self) -> Result<(), SchemaError> {
        self.stack.layer_remove();
        Ok(())
    }

    /// A complete value at the current location: scalars directly, objects
    /// and arrays after their member events. Runs the layer's validators in
    /// reverse order, propagates into the parent layer and closes the
    /// current one.
    pub fn value(&mut self, instance: &Value) -> Result<(), SchemaError> {
        if !instance.is_array() {
            let is_object = instance.is_object();
            let mut iterator = self.stack.layer_iterator();
            while let Some(index) = iterator.next(&self.stack) {
                if self.stack.position(index).result != ValidationResult::Valid {
                    continue;
                }
                if is_object {
                    // composition already ran at object_start; only the
                    // dependency schemas are armed here
                    if self.stack.position(index).schema().kind() == SchemaKind::Object {
                        object::pre_value(self, index, instance)?;
                    }
                } else {
                    composition::composition_check(self, index)?;
                }
            }
        }

        let mut reverse = self.stack.layer_reverse_iterator();
        while let Some(index) = reverse.next(&self.stack) {
            if !super::skip_in_reverse_pass(self, index) {
                let outcome = super::validate_value(self, index, instance)?;
                self.stack.position_mut(index).result = outcome;
                if outcome == ValidationResult::Error {
                    return Err(self.fatal_error());
                }
            }
            result::propagate(self, index);
        }
        self.stack.layer_remove();
        Ok(())
    }
}

//! The convenience driver: validate a fully materialised instance by
//! emitting stream events over it in document order.

use crate::compilation::Schema;
use crate::error::{SchemaError, ValidationResult};
use crate::validation::stream::ValidationStream;
use serde_json::Value;

const DEFAULT_STACK_CAPACITY: usize = 32;

pub(crate) fn validate_instance(
    stream: &mut ValidationStream,
    instance: &Value,
) -> Result<(), SchemaError> {
    match instance {
        Value::Array(items) => {
            stream.array_start()?;
            for item in items {
                validate_instance(stream, item)?;
                stream.array_append(instance, item)?;
            }
            stream.array_end()?;
        }
        Value::Object(members) => {
            stream.object_start()?;
            for (key, member) in members {
                stream.object_key(key)?;
                validate_instance(stream, member)?;
                stream.object_update(instance, key, member)?;
            }
            stream.object_end()?;
        }
        _ => {}
    }
    stream.value(instance)
}

impl Schema {
    /// Validate `instance` against the compiled schema.
    #[must_use]
    pub fn validate(&self, instance: &Value) -> ValidationResult {
        let mut stream = ValidationStream::new(self, DEFAULT_STACK_CAPACITY);
        match validate_instance(&mut stream, instance) {
            Ok(()) => stream.final_result(),
            Err(_) => ValidationResult::Error,
        }
    }

    /// Validate `instance` and return a boolean answer.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance) == ValidationResult::Valid
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationResult;
    use crate::schemas::Draft;
    use crate::Schema;
    use serde_json::json;

    #[test]
    fn validation_is_repeatable() {
        let schema = Schema::compile_with_draft(
            &json!({"type": "array", "items": {"type": "integer"}, "uniqueItems": true}),
            Some(Draft::Draft6),
        )
        .unwrap();
        let instance = json!([1, 2, 3]);
        assert_eq!(schema.validate(&instance), ValidationResult::Valid);
        assert_eq!(schema.validate(&instance), ValidationResult::Valid);
        let bad = json!([1, 1]);
        assert_eq!(schema.validate(&bad), ValidationResult::Invalid);
        assert_eq!(schema.validate(&instance), ValidationResult::Valid);
    }

    #[test]
    fn unresolvable_reference_yields_error() {
        let schema = Schema::compile_with_draft(
            &json!({"type": "object", "properties": {"x": {"$ref": "#/definitions/missing"}}}),
            Some(Draft::Draft6),
        )
        .unwrap();
        assert_eq!(
            schema.validate(&json!({"x": 1})),
            ValidationResult::Error
        );
        // instances not touching the dangling reference still validate
        assert_eq!(schema.validate(&json!({})), ValidationResult::Valid);
    }
}

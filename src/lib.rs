//! # jsonschema-stream
//!
//! A crate for compiling JSON Schema documents (drafts 4 and 6) and
//! validating JSON instances against them in a streaming fashion. The
//! compiled schema is a tree of typed keyword records; validation is a
//! push-driven state machine that walks the instance event by event and
//! keeps a stack of concurrent frames, one per sub-schema applicable at the
//! current location.
//!
//! ## Usage
//!
//! Compile once, validate many times:
//! ```rust
//! use jsonschema_stream::{Schema, ValidationResult};
//! use serde_json::json;
//!
//! let schema = Schema::compile(&json!({
//!     "$schema": "http://json-schema.org/draft-06/schema#",
//!     "type": "object",
//!     "properties": {"n": {"type": "integer", "minimum": 1}},
//!     "required": ["n"]
//! })).unwrap();
//! assert_eq!(schema.validate(&json!({"n": 3})), ValidationResult::Valid);
//! assert_eq!(schema.validate(&json!({"n": 0})), ValidationResult::Invalid);
//! ```
//!
//! Or drive the event surface directly when the instance arrives from a
//! tokeniser rather than a DOM - see [`ValidationStream`].
#![warn(
    clippy::cast_possible_truncation,
    clippy::doc_markdown,
    clippy::explicit_iter_loop,
    clippy::map_unwrap_or,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::print_stdout,
    clippy::redundant_closure,
    clippy::trivially_copy_pass_by_ref,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unreachable_pub,
    variant_size_differences
)]
#![allow(clippy::upper_case_acronyms)]
mod compilation;
pub mod error;
mod helpers;
mod numbers;
mod pointer;
mod resolver;
mod schemas;
mod uri;
mod validation;
mod validator;
mod value;

pub use compilation::Schema;
pub use error::{SchemaError, SchemaErrorKind, ValidationResult};
pub use schemas::Draft;
pub use validation::stream::ValidationStream;
use serde_json::Value;

/// A shortcut for validating `instance` against `schema`.
/// ```rust
/// use jsonschema_stream::is_valid;
/// use serde_json::json;
///
/// let schema = json!({
///     "$schema": "http://json-schema.org/draft-06/schema#",
///     "maxLength": 5
/// });
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
///
/// This function panics if an invalid schema is passed.
#[must_use]
#[inline]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let compiled = Schema::compile(schema).expect("Invalid schema");
    compiled.is_valid(instance)
}

#[cfg(test)]
pub(crate) mod tests_util {
    use super::{Draft, Schema, ValidationResult};
    use serde_json::Value;

    pub(crate) fn compile(schema: &Value) -> Schema {
        Schema::compile_with_draft(schema, Some(Draft::Draft6)).expect("Should be a valid schema")
    }

    pub(crate) fn is_valid(schema: &Value, instance: &Value) {
        assert_eq!(
            compile(schema).validate(instance),
            ValidationResult::Valid,
            "{} should be valid",
            instance
        );
    }

    pub(crate) fn is_not_valid(schema: &Value, instance: &Value) {
        assert_eq!(
            compile(schema).validate(instance),
            ValidationResult::Invalid,
            "{} should not be valid",
            instance
        );
    }

    pub(crate) fn expect_error_message(schema: &Value, instance: &Value, message: &str) {
        let compiled = compile(schema);
        let mut stream = crate::ValidationStream::new(&compiled, 16);
        crate::validator::validate_instance(&mut stream, instance).expect("Should not be fatal");
        assert_eq!(stream.final_result(), ValidationResult::Invalid);
        assert_eq!(
            stream.error().expect("Should record an error").message(),
            message
        );
    }
}

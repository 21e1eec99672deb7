//! Reference resolver. Implements the logic required by the `$ref` keyword.
//!
//! Resolution is lazy: a [`Reference`] created at compile time holds only its
//! target URI; the compiled target is produced on first touch during
//! composition push and memoised both on the reference and in the schema's
//! URI-keyed dereference cache. The cache is what terminates reference
//! cycles - once any participant of a cycle lands in it, the remaining
//! resolutions short-circuit.

use crate::compilation::{compile_value, context::CompilationContext, Schema};
use crate::error::{SchemaError, SchemaErrorKind};
use crate::pointer;
use crate::uri::SchemaUri;
use crate::value::SchemaValue;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

pub(crate) struct Reference {
    uri: SchemaUri,
    /// Base URI of the referencing schema value; the target compiles against
    /// it so that `$id` scoping carries through the reference.
    base: SchemaUri,
    resolved: RwLock<Option<Arc<SchemaValue>>>,
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the resolved value may point back into the owning tree
        f.debug_struct("Reference").field("uri", &self.uri).finish()
    }
}

impl Reference {
    pub(crate) fn create(base: &SchemaUri, target: &str) -> Result<Reference, SchemaError> {
        let uri = SchemaUri::set(base, target).map_err(|error| {
            SchemaError::new(
                SchemaErrorKind::ReferenceResolve,
                format!("Invalid reference URI {}: {}", target, error),
            )
        })?;
        Ok(Reference {
            uri,
            base: base.inherit(),
            resolved: RwLock::new(None),
        })
    }

    /// Resolve the reference within `schema`, producing the compiled target.
    ///
    /// At most one `SchemaValue` is created per distinct URI per schema;
    /// repeated resolutions return the same `Arc`.
    pub(crate) fn resolve(&self, schema: &Schema) -> Result<Arc<SchemaValue>, SchemaError> {
        if let Some(resolved) = self.resolved.read().as_ref() {
            return Ok(Arc::clone(resolved));
        }
        if let Some(cached) = schema.deref_cache().read().get(self.uri.as_str()) {
            let value = Arc::clone(cached);
            *self.resolved.write() = Some(Arc::clone(&value));
            return Ok(value);
        }

        if !schema.root().base_uri.base_equal(&self.uri) {
            return Err(SchemaError::new(
                SchemaErrorKind::ReferenceExternal,
                "External references are not supported",
            ));
        }

        let fragment = match self.uri.fragment() {
            None | Some("") => {
                let root = Arc::clone(schema.root());
                *self.resolved.write() = Some(Arc::clone(&root));
                return Ok(root);
            }
            Some(fragment) => fragment,
        };
        let fragment = percent_encoding::percent_decode_str(fragment)
            .decode_utf8()
            .map_err(|error| {
                SchemaError::new(
                    SchemaErrorKind::ReferenceResolve,
                    format!("Invalid reference fragment encoding: {}", error),
                )
            })?;

        let target = pointer::resolve(schema.doc(), fragment.as_ref()).ok_or_else(|| {
            SchemaError::new(
                SchemaErrorKind::ReferenceResolve,
                format!(
                    "Reference {} does not resolve to any schema location",
                    self.uri.as_str()
                ),
            )
        })?;

        let context = CompilationContext::new(schema.draft(), self.base.inherit());
        let compiled = Arc::new(compile_value(target, &context)?);

        let mut cache = schema.deref_cache().write();
        let value = Arc::clone(
            cache
                .entry(self.uri.as_str().to_owned())
                .or_insert(compiled),
        );
        drop(cache);

        *self.resolved.write() = Some(Arc::clone(&value));
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::Draft;
    use serde_json::json;

    fn compile(schema: &serde_json::Value) -> Schema {
        Schema::compile_with_draft(schema, Some(Draft::Draft6)).unwrap()
    }

    #[test]
    fn resolves_definitions_pointer() {
        let schema = compile(&json!({
            "definitions": {"pos": {"type": "integer", "minimum": 1}},
            "$ref": "#/definitions/pos"
        }));
        let reference = schema.root().reference.as_ref().unwrap();
        let resolved = reference.resolve(&schema).unwrap();
        assert_eq!(resolved.kind(), crate::value::SchemaKind::Integer);
    }

    #[test]
    fn resolving_twice_reuses_the_compiled_value() {
        let schema = compile(&json!({
            "definitions": {"pos": {"type": "integer"}},
            "$ref": "#/definitions/pos"
        }));
        let reference = schema.root().reference.as_ref().unwrap();
        let first = reference.resolve(&schema).unwrap();
        let second = reference.resolve(&schema).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(schema.deref_cache().read().len(), 1);
    }

    #[test]
    fn empty_fragment_resolves_to_the_root() {
        let schema = compile(&json!({
            "type": "object",
            "properties": {"self": {"$ref": "#"}}
        }));
        let properties = schema.root().object().properties.as_ref().unwrap();
        let reference = properties["self"].reference.as_ref().unwrap();
        let resolved = reference.resolve(&schema).unwrap();
        assert!(Arc::ptr_eq(&resolved, schema.root()));
    }

    #[test]
    fn external_references_are_rejected() {
        let schema = compile(&json!({
            "type": "object",
            "properties": {"x": {"$ref": "http://example.com/other.json#/definitions/a"}}
        }));
        let properties = schema.root().object().properties.as_ref().unwrap();
        let reference = properties["x"].reference.as_ref().unwrap();
        let error = reference.resolve(&schema).unwrap_err();
        assert_eq!(error.kind(), SchemaErrorKind::ReferenceExternal);
    }

    #[test]
    fn dangling_pointer_is_a_resolve_error() {
        let schema = compile(&json!({
            "type": "object",
            "properties": {"x": {"$ref": "#/definitions/missing"}}
        }));
        let properties = schema.root().object().properties.as_ref().unwrap();
        let reference = properties["x"].reference.as_ref().unwrap();
        let error = reference.resolve(&schema).unwrap_err();
        assert_eq!(error.kind(), SchemaErrorKind::ReferenceResolve);
    }

    #[test]
    fn escaped_pointer_members_resolve() {
        let schema = compile(&json!({
            "definitions": {"a/b": {"type": "string"}},
            "$ref": "#/definitions/a~1b"
        }));
        let reference = schema.root().reference.as_ref().unwrap();
        let resolved = reference.resolve(&schema).unwrap();
        assert_eq!(resolved.kind(), crate::value::SchemaKind::String);
    }
}

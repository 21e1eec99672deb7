//! Schema compilation.
//!
//! The input JSON document is compiled into a tree of
//! [`SchemaValue`](crate::value::SchemaValue) nodes rooted in a [`Schema`].
//! Compilation is keyed on the `type` keyword: a concrete type name selects a
//! per-kind compiler, an absent `type` compiles the seven possible kinds as
//! probe branches (retaining the non-empty ones under the synthetic
//! `type_any` keyword) and a `type` array compiles one branch per listed name
//! under `type_list`.

pub(crate) mod context;
pub(crate) mod keywords;

use crate::error::{SchemaError, SchemaErrorKind};
use crate::helpers::json_type_name;
use crate::resolver::Reference;
use crate::schemas::{self, Draft};
use crate::uri::SchemaUri;
use crate::value::{
    ArraySchema, BoolOrSchema, Dependency, ExclusiveBound, Items, NumericSchema, ObjectSchema,
    SchemaData, SchemaKind, SchemaValue, StringSchema,
};
use ahash::AHashMap;
use context::CompilationContext;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// A compiled JSON Schema document.
pub struct Schema {
    root: Arc<SchemaValue>,
    doc: Value,
    draft: Draft,
    deref_cache: RwLock<AHashMap<String, Arc<SchemaValue>>>,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("draft", &self.draft)
            .field("doc", &self.doc)
            .finish()
    }
}

impl Schema {
    /// Compile a schema document, reading the draft from `$schema`.
    ///
    /// ```rust
    /// # use jsonschema_stream::Schema;
    /// # use serde_json::json;
    /// let schema = Schema::compile(&json!({
    ///     "$schema": "http://json-schema.org/draft-06/schema#",
    ///     "type": "integer",
    ///     "minimum": 1
    /// })).unwrap();
    /// assert!(schema.is_valid(&json!(3)));
    /// ```
    pub fn compile(doc: &Value) -> Result<Schema, SchemaError> {
        Schema::compile_with_draft(doc, None)
    }

    /// Compile a schema document with a fallback draft used when the document
    /// has no `$schema`. With `None` a missing `$schema` is a `Version`
    /// error.
    pub fn compile_with_draft(
        doc: &Value,
        default_draft: Option<Draft>,
    ) -> Result<Schema, SchemaError> {
        let draft = schemas::select_draft(doc, default_draft)?;
        match doc {
            Value::Object(_) => {}
            Value::Bool(_) if draft >= Draft::Draft6 => {}
            _ => {
                return Err(SchemaError::new(
                    SchemaErrorKind::RootDataType,
                    "Root data type is not an object",
                ))
            }
        }
        let context = CompilationContext::new(draft, SchemaUri::root_scope());
        let root = Arc::new(compile_value(doc, &context)?);
        let schema = Schema {
            root,
            doc: doc.clone(),
            draft,
            deref_cache: RwLock::new(AHashMap::new()),
        };
        // Best effort for a root-level `$ref`; everything nested resolves
        // lazily on first touch during validation.
        if let Some(reference) = &schema.root.reference {
            let _ = reference.resolve(&schema);
        }
        Ok(schema)
    }

    /// The draft this schema was compiled against.
    #[must_use]
    pub fn draft(&self) -> Draft {
        self.draft
    }

    pub(crate) fn root(&self) -> &Arc<SchemaValue> {
        &self.root
    }

    pub(crate) fn doc(&self) -> &Value {
        &self.doc
    }

    pub(crate) fn deref_cache(&self) -> &RwLock<AHashMap<String, Arc<SchemaValue>>> {
        &self.deref_cache
    }
}

/// Compile one schema value. `data` must be an object, or a boolean from
/// draft 6 on.
pub(crate) fn compile_value(
    data: &Value,
    context: &CompilationContext,
) -> Result<SchemaValue, SchemaError> {
    if let Value::Bool(literal) = data {
        if context.draft >= Draft::Draft6 {
            let mut value = SchemaValue::new(SchemaData::BooleanSchema, context.base_uri.inherit());
            value.boolean_true = *literal;
            return Ok(value);
        }
        return Err(SchemaError::new(
            SchemaErrorKind::ValueDataType,
            "Boolean schemas are only allowed from draft 6 on",
        ));
    }
    let map = match data.as_object() {
        Some(map) => map,
        None => {
            return Err(SchemaError::new(
                SchemaErrorKind::ValueDataType,
                format!(
                    "Invalid schema value type - expected object but given {}",
                    json_type_name(data)
                ),
            ))
        }
    };
    match map.get("type") {
        None => compile_mixed(map, context),
        Some(Value::String(type_name)) => {
            let kind = kind_from_name(type_name)?;
            compile_typed(map, context, kind, true)
        }
        Some(Value::Array(types)) => compile_type_list(map, context, types),
        Some(other) => Err(SchemaError::new(
            SchemaErrorKind::TypeUnknown,
            format!(
                "Invalid type for type - expected string or array but given {}",
                json_type_name(other)
            ),
        )),
    }
}

fn kind_from_name(type_name: &str) -> Result<SchemaKind, SchemaError> {
    if type_name.is_empty() {
        return Err(SchemaError::new(
            SchemaErrorKind::TypeInvalid,
            "Invalid schema type because it is an empty string",
        ));
    }
    match type_name {
        "null" => Ok(SchemaKind::Null),
        "boolean" => Ok(SchemaKind::Boolean),
        "integer" => Ok(SchemaKind::Integer),
        "number" => Ok(SchemaKind::Number),
        "string" => Ok(SchemaKind::String),
        "array" => Ok(SchemaKind::Array),
        "object" => Ok(SchemaKind::Object),
        other => Err(SchemaError::new(
            SchemaErrorKind::TypeInvalid,
            format!("Invalid schema type {}", other),
        )),
    }
}

const MIXED_PROBE_KINDS: [SchemaKind; 7] = [
    SchemaKind::Null,
    SchemaKind::Boolean,
    SchemaKind::Integer,
    SchemaKind::Number,
    SchemaKind::String,
    SchemaKind::Array,
    SchemaKind::Object,
];

/// A schema without a `type` keyword: compile every concrete kind against the
/// same object and keep the branches that picked up a constraint.
fn compile_mixed(
    map: &Map<String, Value>,
    context: &CompilationContext,
) -> Result<SchemaValue, SchemaError> {
    let mut value = compile_typed(map, context, SchemaKind::Mixed, true)?;
    if value.ref_only {
        return Ok(value);
    }
    let child_context = context.with_base(value.base_uri.inherit());
    let mut branches = Vec::new();
    for kind in &MIXED_PROBE_KINDS {
        let probe = compile_typed(map, &child_context, *kind, false)?;
        if probe.not_empty {
            branches.push(Arc::new(probe));
        }
    }
    value.common.type_any = Some(branches);
    Ok(value)
}

/// A schema whose `type` is an array of unique type names: one branch per
/// listed type, all retained, combined through the `type_list` latch at
/// validation time.
fn compile_type_list(
    map: &Map<String, Value>,
    context: &CompilationContext,
    types: &[Value],
) -> Result<SchemaValue, SchemaError> {
    let type_names = keywords::unique_string_array("type", types)?;
    let mut value = compile_typed(map, context, SchemaKind::Mixed, true)?;
    if value.ref_only {
        return Ok(value);
    }
    let child_context = context.with_base(value.base_uri.inherit());
    let mut branches = Vec::with_capacity(type_names.len());
    for type_name in &type_names {
        let kind = kind_from_name(type_name)?;
        branches.push(Arc::new(compile_typed(map, &child_context, kind, false)?));
    }
    value.common.type_list = Some(branches);
    Ok(value)
}

/// Compile a value of a known kind. `init_common` is false for the synthetic
/// type branches, which share the parent's JSON object but only read their
/// kind-specific keywords.
fn compile_typed(
    map: &Map<String, Value>,
    context: &CompilationContext,
    kind: SchemaKind,
    init_common: bool,
) -> Result<SchemaValue, SchemaError> {
    let base_uri = if init_common {
        match keywords::get_string(map, schemas::id_keyword(context.draft))? {
            Some(id) => SchemaUri::set(&context.base_uri, &id)?,
            None => context.base_uri.inherit(),
        }
    } else {
        context.base_uri.inherit()
    };

    let data = match kind {
        SchemaKind::Mixed => SchemaData::Mixed,
        SchemaKind::Null => SchemaData::Null,
        SchemaKind::Boolean => SchemaData::Boolean,
        SchemaKind::Integer => SchemaData::Integer(Box::new(NumericSchema::default())),
        SchemaKind::Number => SchemaData::Number(Box::new(NumericSchema::default())),
        SchemaKind::String => SchemaData::String(Box::new(StringSchema::default())),
        SchemaKind::Array => SchemaData::Array(Box::new(ArraySchema::default())),
        SchemaKind::Object => SchemaData::Object(Box::new(ObjectSchema::default())),
        SchemaKind::BooleanSchema => unreachable!("boolean schemas are compiled directly"),
    };
    let mut value = SchemaValue::new(data, base_uri);
    let child_context = context.with_base(value.base_uri.inherit());

    if init_common {
        init_common_fields(&mut value, map, &child_context)?;
        if value.ref_only {
            return Ok(value);
        }
    }

    match kind {
        SchemaKind::Integer | SchemaKind::Number => {
            let mut numeric = NumericSchema::default();
            let constrained = extract_numeric(&mut numeric, map, context.draft)?;
            value.not_empty |= constrained;
            value.data = if kind == SchemaKind::Integer {
                SchemaData::Integer(Box::new(numeric))
            } else {
                SchemaData::Number(Box::new(numeric))
            };
        }
        SchemaKind::String => {
            let string = StringSchema {
                max_length: keywords::get_u64(map, "maxLength")?,
                min_length: keywords::get_u64(map, "minLength")?,
                pattern: keywords::get_regex(map, "pattern")?,
            };
            value.not_empty |= string.max_length.is_some()
                || string.min_length.is_some()
                || string.pattern.is_some();
            value.data = SchemaData::String(Box::new(string));
        }
        SchemaKind::Array => {
            let array = extract_array(map, &child_context)?;
            value.not_empty |= array.items.is_some()
                || array.additional_items.is_some()
                || array.unique_items.is_some()
                || array.max_items.is_some()
                || array.min_items.is_some()
                || array.contains.is_some();
            value.data = SchemaData::Array(Box::new(array));
        }
        SchemaKind::Object => {
            let object = extract_object(map, &child_context)?;
            value.not_empty |= object.min_properties.is_some()
                || object.max_properties.is_some()
                || object.additional_properties.is_some()
                || object.properties.is_some()
                || object.pattern_properties.is_some()
                || object.required.is_some()
                || object.dependencies.is_some()
                || object.property_names.is_some();
            value.data = SchemaData::Object(Box::new(object));
        }
        SchemaKind::Mixed
        | SchemaKind::Null
        | SchemaKind::Boolean
        | SchemaKind::BooleanSchema => {}
    }

    Ok(value)
}

/// Keywords allowed next to `$ref` without disturbing its ref-only nature.
const METADATA_KEYWORDS: [&str; 5] = ["$ref", "$schema", "title", "description", "default"];

fn is_ref_only(map: &Map<String, Value>) -> bool {
    map.keys()
        .all(|key| METADATA_KEYWORDS.contains(&key.as_str()))
}

fn init_common_fields(
    value: &mut SchemaValue,
    map: &Map<String, Value>,
    child_context: &CompilationContext,
) -> Result<(), SchemaError> {
    let draft = child_context.draft;

    value.common.default_value = map.get("default").cloned();
    value.common.title = keywords::get_string(map, "title")?;
    value.common.description = keywords::get_string(map, "description")?;
    value.common.id = keywords::get_string(map, schemas::id_keyword(draft))?;
    value.not_empty |= value.common.default_value.is_some()
        || value.common.title.is_some()
        || value.common.description.is_some()
        || value.common.id.is_some();

    if let Some(target) = keywords::get_string(map, "$ref")? {
        value.reference = Some(Reference::create(&value.base_uri, &target)?);
        value.not_empty = true;
        if is_ref_only(map) {
            value.ref_only = true;
            return Ok(());
        }
    }

    value.common.enum_values = keywords::get_unique_array(map, "enum")?;
    if draft >= Draft::Draft6 {
        value.common.const_value = map.get("const").cloned();
    }
    value.common.all_of = get_schema_array(map, "allOf", child_context)?;
    value.common.any_of = get_schema_array(map, "anyOf", child_context)?;
    value.common.one_of = get_schema_array(map, "oneOf", child_context)?;
    value.common.not = get_schema(map, "not", child_context)?;
    value.common.definitions = get_schema_map(map, "definitions", child_context)?;
    value.not_empty |= value.common.enum_values.is_some()
        || value.common.const_value.is_some()
        || value.common.all_of.is_some()
        || value.common.any_of.is_some()
        || value.common.one_of.is_some()
        || value.common.not.is_some()
        || value.common.definitions.is_some();

    Ok(())
}

fn extract_numeric(
    numeric: &mut NumericSchema,
    map: &Map<String, Value>,
    draft: Draft,
) -> Result<bool, SchemaError> {
    numeric.multiple_of = keywords::get_positive_number(map, "multipleOf")?;
    numeric.minimum = keywords::get_number(map, "minimum")?;
    numeric.maximum = keywords::get_number(map, "maximum")?;

    if draft >= Draft::Draft6 {
        numeric.exclusive_minimum = keywords::get_number(map, "exclusiveMinimum")?
            .map(ExclusiveBound::Limit);
        numeric.exclusive_maximum = keywords::get_number(map, "exclusiveMaximum")?
            .map(ExclusiveBound::Limit);
    } else {
        numeric.exclusive_minimum = keywords::get_bool(map, "exclusiveMinimum")?
            .map(ExclusiveBound::Flag);
        numeric.exclusive_maximum = keywords::get_bool(map, "exclusiveMaximum")?
            .map(ExclusiveBound::Flag);
        if numeric.exclusive_minimum.is_some() && numeric.minimum.is_none() {
            return Err(SchemaError::new(
                SchemaErrorKind::ValueDataDeps,
                "The minimum must be set when exclusiveMinimum is set",
            ));
        }
        if numeric.exclusive_maximum.is_some() && numeric.maximum.is_none() {
            return Err(SchemaError::new(
                SchemaErrorKind::ValueDataDeps,
                "The maximum must be set when exclusiveMaximum is set",
            ));
        }
    }

    Ok(numeric.multiple_of.is_some()
        || numeric.minimum.is_some()
        || numeric.maximum.is_some()
        || numeric.exclusive_minimum.is_some()
        || numeric.exclusive_maximum.is_some())
}

fn extract_array(
    map: &Map<String, Value>,
    context: &CompilationContext,
) -> Result<ArraySchema, SchemaError> {
    Ok(ArraySchema {
        additional_items: get_bool_or_schema(map, "additionalItems", context)?,
        items: get_items(map, context)?,
        unique_items: keywords::get_bool(map, "uniqueItems")?,
        max_items: keywords::get_u64(map, "maxItems")?,
        min_items: keywords::get_u64(map, "minItems")?,
        contains: if context.draft >= Draft::Draft6 {
            get_schema(map, "contains", context)?
        } else {
            None
        },
    })
}

fn extract_object(
    map: &Map<String, Value>,
    context: &CompilationContext,
) -> Result<ObjectSchema, SchemaError> {
    Ok(ObjectSchema {
        min_properties: keywords::get_u64(map, "minProperties")?,
        max_properties: keywords::get_u64(map, "maxProperties")?,
        additional_properties: get_bool_or_schema(map, "additionalProperties", context)?,
        properties: get_schema_map(map, "properties", context)?,
        pattern_properties: get_pattern_schemas(map, "patternProperties", context)?,
        required: keywords::get_unique_string_array(map, "required")?,
        dependencies: get_dependencies(map, context)?,
        property_names: if context.draft >= Draft::Draft6 {
            get_schema(map, "propertyNames", context)?
        } else {
            None
        },
    })
}

fn schema_object_expectation(draft: Draft) -> &'static str {
    match draft {
        Draft::Draft4 => "object",
        Draft::Draft6 => "object or boolean",
    }
}

fn is_schema_object(value: &Value, draft: Draft) -> bool {
    value.is_object() || (draft >= Draft::Draft6 && value.is_boolean())
}

/// A keyword whose value is a single sub-schema (`not`, `contains`,
/// `propertyNames`).
fn get_schema(
    map: &Map<String, Value>,
    key: &str,
    context: &CompilationContext,
) -> Result<Option<Arc<SchemaValue>>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(sub) if is_schema_object(sub, context.draft) => {
            Ok(Some(Arc::new(compile_value(sub, context)?)))
        }
        Some(other) => Err(keywords::type_error(
            key,
            schema_object_expectation(context.draft),
            other,
        )),
    }
}

/// A keyword whose value is a non-empty array of sub-schemas (`allOf`,
/// `anyOf`, `oneOf`).
fn get_schema_array(
    map: &Map<String, Value>,
    key: &str,
    context: &CompilationContext,
) -> Result<Option<Vec<Arc<SchemaValue>>>, SchemaError> {
    let items = match map.get(key) {
        None => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(keywords::type_error(key, "array", other)),
    };
    if items.is_empty() {
        return Err(SchemaError::new(
            SchemaErrorKind::KeywordPrep,
            format!("The {} array must not be empty", key),
        ));
    }
    let mut compiled = Vec::with_capacity(items.len());
    for item in items {
        if !is_schema_object(item, context.draft) {
            return Err(keywords::type_error(
                key,
                schema_object_expectation(context.draft),
                item,
            ));
        }
        compiled.push(Arc::new(compile_value(item, context)?));
    }
    Ok(Some(compiled))
}

/// A keyword whose value is an object of sub-schemas (`properties`,
/// `definitions`).
fn get_schema_map(
    map: &Map<String, Value>,
    key: &str,
    context: &CompilationContext,
) -> Result<Option<AHashMap<String, Arc<SchemaValue>>>, SchemaError> {
    let members = match map.get(key) {
        None => return Ok(None),
        Some(Value::Object(members)) => members,
        Some(other) => return Err(keywords::type_error(key, "object", other)),
    };
    let mut compiled = AHashMap::with_capacity(members.len());
    for (name, sub) in members {
        if !is_schema_object(sub, context.draft) {
            return Err(keywords::type_error(
                key,
                schema_object_expectation(context.draft),
                sub,
            ));
        }
        compiled.insert(name.clone(), Arc::new(compile_value(sub, context)?));
    }
    Ok(Some(compiled))
}

/// `patternProperties`: every key compiles to a regex owned by the sub-schema
/// it selects.
fn get_pattern_schemas(
    map: &Map<String, Value>,
    key: &str,
    context: &CompilationContext,
) -> Result<Option<Vec<Arc<SchemaValue>>>, SchemaError> {
    let members = match map.get(key) {
        None => return Ok(None),
        Some(Value::Object(members)) => members,
        Some(other) => return Err(keywords::type_error(key, "object", other)),
    };
    let mut compiled = Vec::with_capacity(members.len());
    for (pattern, sub) in members {
        let regex = keywords::compile_regex(key, pattern)?;
        if !is_schema_object(sub, context.draft) {
            return Err(keywords::type_error(
                key,
                schema_object_expectation(context.draft),
                sub,
            ));
        }
        let mut value = compile_value(sub, context)?;
        value.pattern = Some(regex);
        compiled.push(Arc::new(value));
    }
    Ok(Some(compiled))
}

/// `dependencies`: a non-empty object whose members are either sub-schemas or
/// arrays of unique property names.
fn get_dependencies(
    map: &Map<String, Value>,
    context: &CompilationContext,
) -> Result<Option<AHashMap<String, Dependency>>, SchemaError> {
    let members = match map.get("dependencies") {
        None => return Ok(None),
        Some(Value::Object(members)) => members,
        Some(other) => return Err(keywords::type_error("dependencies", "object", other)),
    };
    if members.is_empty() {
        return Err(SchemaError::new(
            SchemaErrorKind::KeywordPrep,
            "The dependencies object must not be empty",
        ));
    }
    let mut compiled = AHashMap::with_capacity(members.len());
    for (name, member) in members {
        let dependency = match member {
            Value::Array(items) => {
                Dependency::Keys(keywords::unique_string_array("dependencies", items)?)
            }
            sub if is_schema_object(sub, context.draft) => {
                Dependency::Schema(Arc::new(compile_value(sub, context)?))
            }
            other => {
                return Err(keywords::type_error(
                    "dependencies",
                    match context.draft {
                        Draft::Draft4 => "object of schema objects or arrays of strings",
                        Draft::Draft6 => "object of schema objects, booleans or arrays of strings",
                    },
                    other,
                ))
            }
        };
        compiled.insert(name.clone(), dependency);
    }
    Ok(Some(compiled))
}

/// `additionalItems` / `additionalProperties`: a boolean or a sub-schema. The
/// boolean reading wins so that a draft 6 `false` keeps its gate semantics.
fn get_bool_or_schema(
    map: &Map<String, Value>,
    key: &str,
    context: &CompilationContext,
) -> Result<Option<BoolOrSchema>, SchemaError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(BoolOrSchema::Boolean(*value))),
        Some(sub @ Value::Object(_)) => Ok(Some(BoolOrSchema::Schema(Arc::new(compile_value(
            sub, context,
        )?)))),
        Some(other) => Err(keywords::type_error(key, "boolean or object", other)),
    }
}

/// `items`: a single sub-schema or a list of sub-schemas.
fn get_items(
    map: &Map<String, Value>,
    context: &CompilationContext,
) -> Result<Option<Items>, SchemaError> {
    let expectation = match context.draft {
        Draft::Draft4 => "object or array",
        Draft::Draft6 => "object, boolean or array",
    };
    match map.get("items") {
        None => Ok(None),
        Some(Value::Array(items)) => {
            let mut compiled = Vec::with_capacity(items.len());
            for item in items {
                if !is_schema_object(item, context.draft) {
                    return Err(keywords::type_error("items", expectation, item));
                }
                compiled.push(Arc::new(compile_value(item, context)?));
            }
            Ok(Some(Items::List(compiled)))
        }
        Some(sub) if is_schema_object(sub, context.draft) => {
            Ok(Some(Items::Single(Arc::new(compile_value(sub, context)?))))
        }
        Some(other) => Err(keywords::type_error("items", expectation, other)),
    }
}

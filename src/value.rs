//! The compiled schema representation.
//!
//! Every schema object compiles into one [`SchemaValue`]: a kind-specific
//! payload plus the keyword block shared by all kinds. Sub-schemas are held
//! behind `Arc` so that `$ref` resolution and the dereference cache can share
//! compiled nodes without copying; the tree is immutable after compilation
//! apart from reference memoisation.

use crate::numbers::SchemaNumber;
use crate::resolver::Reference;
use crate::uri::SchemaUri;
use ahash::AHashMap;
use fancy_regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Fieldless mirror of the kind payload, used for dispatch and instance type
/// compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SchemaKind {
    Mixed,
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
    BooleanSchema,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Mixed => "mixed",
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::String => "string",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
            SchemaKind::BooleanSchema => "boolean schema",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub(crate) enum SchemaData {
    Mixed,
    Null,
    Boolean,
    Integer(Box<NumericSchema>),
    Number(Box<NumericSchema>),
    String(Box<StringSchema>),
    Array(Box<ArraySchema>),
    Object(Box<ObjectSchema>),
    BooleanSchema,
}

/// Draft 4 encodes exclusive bounds as booleans attached to `minimum` /
/// `maximum`; draft 6 turns them into standalone numeric limits.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExclusiveBound {
    Flag(bool),
    Limit(SchemaNumber),
}

#[derive(Debug, Default)]
pub(crate) struct NumericSchema {
    pub(crate) multiple_of: Option<SchemaNumber>,
    pub(crate) minimum: Option<SchemaNumber>,
    pub(crate) maximum: Option<SchemaNumber>,
    pub(crate) exclusive_minimum: Option<ExclusiveBound>,
    pub(crate) exclusive_maximum: Option<ExclusiveBound>,
}

/// A compiled `pattern` / `patternProperties` regex together with its
/// source, kept for error reporting.
#[derive(Debug)]
pub(crate) struct SchemaPattern {
    pub(crate) original: String,
    pub(crate) regex: Regex,
}

impl SchemaPattern {
    pub(crate) fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text).unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub(crate) struct StringSchema {
    pub(crate) min_length: Option<u64>,
    pub(crate) max_length: Option<u64>,
    pub(crate) pattern: Option<SchemaPattern>,
}

#[derive(Debug)]
pub(crate) enum Items {
    Single(Arc<SchemaValue>),
    List(Vec<Arc<SchemaValue>>),
}

#[derive(Debug)]
pub(crate) enum BoolOrSchema {
    Boolean(bool),
    Schema(Arc<SchemaValue>),
}

#[derive(Debug, Default)]
pub(crate) struct ArraySchema {
    pub(crate) items: Option<Items>,
    pub(crate) additional_items: Option<BoolOrSchema>,
    pub(crate) unique_items: Option<bool>,
    pub(crate) max_items: Option<u64>,
    pub(crate) min_items: Option<u64>,
    pub(crate) contains: Option<Arc<SchemaValue>>,
}

#[derive(Debug)]
pub(crate) enum Dependency {
    Schema(Arc<SchemaValue>),
    Keys(Vec<String>),
}

#[derive(Debug, Default)]
pub(crate) struct ObjectSchema {
    pub(crate) min_properties: Option<u64>,
    pub(crate) max_properties: Option<u64>,
    pub(crate) additional_properties: Option<BoolOrSchema>,
    pub(crate) properties: Option<AHashMap<String, Arc<SchemaValue>>>,
    /// Each entry owns its compiled key regex (`SchemaValue::pattern`).
    pub(crate) pattern_properties: Option<Vec<Arc<SchemaValue>>>,
    pub(crate) required: Option<Vec<String>>,
    pub(crate) dependencies: Option<AHashMap<String, Dependency>>,
    pub(crate) property_names: Option<Arc<SchemaValue>>,
}

/// Keywords shared by every schema kind, including the synthetic `type_any`
/// (absent `type`) and `type_list` (`type` as an array) sub-schema lists.
#[derive(Debug, Default)]
pub(crate) struct CommonFields {
    pub(crate) default_value: Option<Value>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) const_value: Option<Value>,
    pub(crate) all_of: Option<Vec<Arc<SchemaValue>>>,
    pub(crate) any_of: Option<Vec<Arc<SchemaValue>>>,
    pub(crate) one_of: Option<Vec<Arc<SchemaValue>>>,
    pub(crate) not: Option<Arc<SchemaValue>>,
    pub(crate) definitions: Option<AHashMap<String, Arc<SchemaValue>>>,
    pub(crate) type_any: Option<Vec<Arc<SchemaValue>>>,
    pub(crate) type_list: Option<Vec<Arc<SchemaValue>>>,
}

#[derive(Debug)]
pub(crate) struct SchemaValue {
    pub(crate) data: SchemaData,
    pub(crate) base_uri: SchemaUri,
    pub(crate) reference: Option<Reference>,
    /// Set when this value is the target of a `patternProperties` key.
    pub(crate) pattern: Option<SchemaPattern>,
    pub(crate) common: CommonFields,
    /// The schema carries at least one effective constraint. Never cleared
    /// once set; drives retention of `type_any` probe branches.
    pub(crate) not_empty: bool,
    /// The schema contains only `$ref` plus metadata keywords; applicators
    /// are suppressed during composition push.
    pub(crate) ref_only: bool,
    /// Distinguishes the `true` boolean schema from `false`.
    pub(crate) boolean_true: bool,
}

impl SchemaValue {
    pub(crate) fn new(data: SchemaData, base_uri: SchemaUri) -> SchemaValue {
        SchemaValue {
            data,
            base_uri,
            reference: None,
            pattern: None,
            common: CommonFields::default(),
            not_empty: false,
            ref_only: false,
            boolean_true: false,
        }
    }

    pub(crate) fn kind(&self) -> SchemaKind {
        match self.data {
            SchemaData::Mixed => SchemaKind::Mixed,
            SchemaData::Null => SchemaKind::Null,
            SchemaData::Boolean => SchemaKind::Boolean,
            SchemaData::Integer(_) => SchemaKind::Integer,
            SchemaData::Number(_) => SchemaKind::Number,
            SchemaData::String(_) => SchemaKind::String,
            SchemaData::Array(_) => SchemaKind::Array,
            SchemaData::Object(_) => SchemaKind::Object,
            SchemaData::BooleanSchema => SchemaKind::BooleanSchema,
        }
    }

    /// Whether an instance of `kind` may be handed to this schema at all.
    /// `Mixed` and boolean schemas accept every instance type.
    pub(crate) fn is_kind_compatible(&self, kind: SchemaKind) -> bool {
        match self.kind() {
            SchemaKind::Mixed | SchemaKind::BooleanSchema => true,
            own => own == kind,
        }
    }

    pub(crate) fn numeric(&self) -> &NumericSchema {
        match &self.data {
            SchemaData::Integer(data) | SchemaData::Number(data) => data,
            _ => unreachable!("schema value is not numeric"),
        }
    }

    pub(crate) fn string(&self) -> &StringSchema {
        match &self.data {
            SchemaData::String(data) => data,
            _ => unreachable!("schema value is not a string schema"),
        }
    }

    pub(crate) fn array(&self) -> &ArraySchema {
        match &self.data {
            SchemaData::Array(data) => data,
            _ => unreachable!("schema value is not an array schema"),
        }
    }

    pub(crate) fn object(&self) -> &ObjectSchema {
        match &self.data {
            SchemaData::Object(data) => data,
            _ => unreachable!("schema value is not an object schema"),
        }
    }
}

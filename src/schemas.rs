use crate::error::{SchemaError, SchemaErrorKind};
use serde_json::Value;

/// JSON Schema Draft version
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub enum Draft {
    /// JSON Schema Draft 4
    Draft4,
    /// JSON Schema Draft 6
    Draft6,
}

const DRAFT_04_URL: &str = "http://json-schema.org/draft-04/schema#";
const DRAFT_06_URL: &str = "http://json-schema.org/draft-06/schema#";
const DRAFT_07_URL: &str = "http://json-schema.org/draft-07/schema#";
const DRAFT_2019_09_URL: &str = "https://json-schema.org/draft/2019-09/schema";
const DRAFT_2020_12_URL: &str = "https://json-schema.org/draft/2020-12/schema";
const LATEST_URL: &str = "http://json-schema.org/schema#";

/// Get the `Draft` from a JSON Schema URL.
#[inline]
pub(crate) fn draft_from_url(url: &str) -> Option<Draft> {
    match url {
        DRAFT_06_URL => Some(Draft::Draft6),
        DRAFT_04_URL => Some(Draft::Draft4),
        _ => None,
    }
}

/// Select the draft for a schema document from its `$schema` value, falling
/// back to `default` when the keyword is absent. Known newer drafts are
/// rejected with a dedicated message.
pub(crate) fn select_draft(
    schema: &Value,
    default: Option<Draft>,
) -> Result<Draft, SchemaError> {
    let version = match schema.get("$schema") {
        None => {
            return default.ok_or_else(|| {
                SchemaError::new(
                    SchemaErrorKind::Version,
                    "The $schema field is omitted and no default version is set",
                )
            })
        }
        Some(Value::String(version)) => version.as_str(),
        Some(_) => {
            return Err(SchemaError::new(
                SchemaErrorKind::Version,
                "The $schema value must be a string",
            ))
        }
    };
    if let Some(draft) = draft_from_url(version) {
        return Ok(draft);
    }
    let message = match version {
        DRAFT_07_URL => "Draft 7 is not supported".to_string(),
        DRAFT_2019_09_URL => "Draft 2019-09 is not supported".to_string(),
        DRAFT_2020_12_URL => "Draft 2020-12 is not supported".to_string(),
        LATEST_URL => format!(
            "The identifier {} is not supported as it is deprecated by spec",
            LATEST_URL
        ),
        other => format!(
            "Unknown $schema {}, only drafts 4 and 6 are supported",
            other
        ),
    };
    Err(SchemaError::new(SchemaErrorKind::Version, message))
}

/// The identifier keyword is `id` in draft 4 and `$id` from draft 6 on.
#[inline]
pub(crate) fn id_keyword(draft: Draft) -> &'static str {
    match draft {
        Draft::Draft4 => "id",
        Draft::Draft6 => "$id",
    }
}

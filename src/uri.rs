//! Base URI handling for `$id` scoping and `$ref` targets.

use crate::error::{SchemaError, SchemaErrorKind};
use url::Url;

pub(crate) const DEFAULT_ROOT_URL: &str = "json-schema:///";

lazy_static::lazy_static! {
    static ref DEFAULT_SCOPE: Url = Url::parse(DEFAULT_ROOT_URL).expect("Is a valid URL");
}

/// An absolute schema URI. Empty fragments are normalised away so that a
/// `$ref` of `#` and an absent fragment behave identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaUri {
    url: Url,
}

impl SchemaUri {
    /// The default scope used when the root schema carries no `$id`.
    pub(crate) fn root_scope() -> SchemaUri {
        SchemaUri {
            url: DEFAULT_SCOPE.clone(),
        }
    }

    /// Resolve `value` against `base`.
    pub(crate) fn set(base: &SchemaUri, value: &str) -> Result<SchemaUri, SchemaError> {
        let mut url = base.url.join(value).map_err(|error| {
            SchemaError::new(
                SchemaErrorKind::Id,
                format!("Invalid URI {}: {}", value, error),
            )
        })?;
        if url.fragment() == Some("") {
            url.set_fragment(None);
        }
        Ok(SchemaUri { url })
    }

    /// Copy the base URI of the parent schema value.
    pub(crate) fn inherit(&self) -> SchemaUri {
        self.clone()
    }

    /// Compare two URIs ignoring their fragments.
    pub(crate) fn base_equal(&self, other: &SchemaUri) -> bool {
        let left = self.url.as_str();
        let right = other.url.as_str();
        left.split('#').next() == right.split('#').next()
    }

    pub(crate) fn fragment(&self) -> Option<&str> {
        self.url.fragment()
    }

    pub(crate) fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::SchemaUri;

    #[test]
    fn set_resolves_relative_references() {
        let root = SchemaUri::root_scope();
        let uri = SchemaUri::set(&root, "#/definitions/item").unwrap();
        assert_eq!(uri.as_str(), "json-schema:///#/definitions/item");
        assert_eq!(uri.fragment(), Some("/definitions/item"));
    }

    #[test]
    fn empty_fragment_is_discarded() {
        let root = SchemaUri::root_scope();
        let uri = SchemaUri::set(&root, "#").unwrap();
        assert_eq!(uri.fragment(), None);
    }

    #[test]
    fn base_equal_ignores_fragments() {
        let root = SchemaUri::root_scope();
        let left = SchemaUri::set(&root, "#/definitions/a").unwrap();
        let right = SchemaUri::set(&root, "#/definitions/b").unwrap();
        assert!(left.base_equal(&right));
        let other = SchemaUri::set(&root, "http://example.com/schema#/a").unwrap();
        assert!(!left.base_equal(&other));
    }

    #[test]
    fn id_changes_the_base() {
        let root = SchemaUri::root_scope();
        let scoped = SchemaUri::set(&root, "http://example.com/root.json").unwrap();
        let nested = SchemaUri::set(&scoped, "nested.json").unwrap();
        assert_eq!(nested.as_str(), "http://example.com/nested.json");
        assert!(!nested.base_equal(&root));
    }
}

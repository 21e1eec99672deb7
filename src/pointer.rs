//! JSON Pointer traversal over the original schema document, used by the
//! `$ref` resolver.

use serde_json::Value;
use std::borrow::Cow;

/// Searching twice is better than unconditionally allocating a String twice
trait MaybeReplaceExt<'a> {
    fn maybe_replace(self, needle: &str, replacement: &str) -> Cow<'a, str>;
}

impl<'a> MaybeReplaceExt<'a> for &'a str {
    fn maybe_replace(self, needle: &str, replacement: &str) -> Cow<'a, str> {
        if memchr::memmem::find(self.as_bytes(), needle.as_bytes()).is_some() {
            self.replace(needle, replacement).into()
        } else {
            self.into()
        }
    }
}

impl<'a> MaybeReplaceExt<'a> for Cow<'a, str> {
    fn maybe_replace(self, needle: &str, replacement: &str) -> Cow<'a, str> {
        if memchr::memmem::find(self.as_bytes(), needle.as_bytes()).is_some() {
            self.replace(needle, replacement).into()
        } else {
            self
        }
    }
}

fn parse_index(s: &str) -> Option<usize> {
    if s.starts_with('+') || (s.starts_with('0') && s.len() != 1) {
        None
    } else {
        s.parse().ok()
    }
}

/// Resolve a JSON pointer within `document`. An empty pointer addresses the
/// document itself; anything else must start with `/`.
pub(crate) fn resolve<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    if pointer.is_empty() {
        return Some(document);
    }
    if !pointer.starts_with('/') {
        return None;
    }
    let tokens = pointer
        .split('/')
        .skip(1)
        .map(|token| token.maybe_replace("~1", "/").maybe_replace("~0", "~"));
    let mut target = document;

    for token in tokens {
        let target_opt = match *target {
            Value::Object(ref map) => map.get(&*token),
            Value::Array(ref list) => parse_index(&token).and_then(|index| list.get(index)),
            _ => return None,
        };
        if let Some(next) = target_opt {
            target = next;
        } else {
            return None;
        }
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use serde_json::json;

    #[test]
    fn resolves_nested_members() {
        let document = json!({"definitions": {"a": {"type": "integer"}}});
        assert_eq!(
            resolve(&document, "/definitions/a"),
            Some(&json!({"type": "integer"}))
        );
        assert_eq!(resolve(&document, "/definitions/b"), None);
    }

    #[test]
    fn resolves_array_indices() {
        let document = json!({"items": [{"a": 1}, {"b": 2}]});
        assert_eq!(resolve(&document, "/items/1"), Some(&json!({"b": 2})));
        assert_eq!(resolve(&document, "/items/01"), None);
        assert_eq!(resolve(&document, "/items/2"), None);
    }

    #[test]
    fn unescapes_tokens() {
        let document = json!({"a/b": 1, "m~n": 2});
        assert_eq!(resolve(&document, "/a~1b"), Some(&json!(1)));
        assert_eq!(resolve(&document, "/m~0n"), Some(&json!(2)));
    }

    #[test]
    fn empty_pointer_is_the_document() {
        let document = json!({"x": 1});
        assert_eq!(resolve(&document, ""), Some(&document));
        assert_eq!(resolve(&document, "x"), None);
    }
}

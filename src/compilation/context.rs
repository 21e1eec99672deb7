use crate::schemas::Draft;
use crate::uri::SchemaUri;

/// State threaded through recursive schema compilation: the draft in effect
/// and the base URI of the value currently being compiled.
#[derive(Debug, Clone)]
pub(crate) struct CompilationContext {
    pub(crate) draft: Draft,
    pub(crate) base_uri: SchemaUri,
}

impl CompilationContext {
    pub(crate) fn new(draft: Draft, base_uri: SchemaUri) -> CompilationContext {
        CompilationContext { draft, base_uri }
    }

    /// Context for sub-schemas of a value whose base URI is `base_uri`.
    pub(crate) fn with_base(&self, base_uri: SchemaUri) -> CompilationContext {
        CompilationContext {
            draft: self.draft,
            base_uri,
        }
    }
}

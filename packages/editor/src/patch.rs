//! # Patching
//!
//! Rewrites the editable region of a component source and nothing else.
//!
//! The patcher walks the same chain as the extractor. Bytes outside the
//! located region are copied through untouched; when no heuristic matches the
//! source comes back unchanged as [`PatchOutcome::NoMatch`], which callers
//! must surface as a failure.

use crate::heuristics::{locate, EditableRegion};
use crate::{DocumentKind, EditorError, EditorResult};

/// Result of a patch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The region was located and replaced
    Applied {
        source: String,
        /// Region in the original source that was replaced
        region: EditableRegion,
    },
    /// No heuristic matched; `source` is the original text
    NoMatch { source: String },
}

impl PatchOutcome {
    /// Whether a region was located and rewritten
    pub fn changed(&self) -> bool {
        matches!(self, PatchOutcome::Applied { .. })
    }

    pub fn source(&self) -> &str {
        match self {
            PatchOutcome::Applied { source, .. } | PatchOutcome::NoMatch { source } => source,
        }
    }

    pub fn region(&self) -> Option<&EditableRegion> {
        match self {
            PatchOutcome::Applied { region, .. } => Some(region),
            PatchOutcome::NoMatch { .. } => None,
        }
    }

    /// Convert into the patched source, failing on `NoMatch`
    pub fn into_result(self, kind: DocumentKind) -> EditorResult<String> {
        match self {
            PatchOutcome::Applied { source, .. } => Ok(source),
            PatchOutcome::NoMatch { .. } => Err(EditorError::NoEditableRegion { kind }),
        }
    }
}

/// Replace the editable region of `source` with `new_content`
pub fn patch(source: &str, new_content: &str, kind: DocumentKind) -> PatchOutcome {
    let Some(region) = locate(source, kind) else {
        return PatchOutcome::NoMatch {
            source: source.to_string(),
        };
    };

    let mut patched =
        String::with_capacity(source.len() - region.range.len() + new_content.len());
    patched.push_str(&source[..region.range.start]);
    patched.push_str(new_content);
    patched.push_str(&source[region.range.end..]);

    PatchOutcome::Applied {
        source: patched,
        region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_surrounding_whitespace() {
        let source = "function Page() {\n  return (\n    <p>Old</p>\n  );\n}";
        let outcome = patch(source, "<p>New</p>", DocumentKind::Page);
        assert_eq!(
            outcome.source(),
            "function Page() {\n  return (\n    <p>New</p>\n  );\n}"
        );
    }

    #[test]
    fn test_no_match_returns_original() {
        let source = "export const config = { runtime: 'edge' };";
        let outcome = patch(source, "<p>New</p>", DocumentKind::Page);
        assert!(!outcome.changed());
        assert_eq!(outcome.source(), source);
        assert_eq!(
            outcome.into_result(DocumentKind::Page),
            Err(EditorError::NoEditableRegion {
                kind: DocumentKind::Page
            })
        );
    }

    #[test]
    fn test_identical_content_is_still_applied() {
        let source = "function Page() { return (<p>Same</p>); }";
        let outcome = patch(source, "<p>Same</p>", DocumentKind::Page);
        assert!(outcome.changed());
        assert_eq!(outcome.source(), source);
    }
}

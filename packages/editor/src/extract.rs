//! # Extraction
//!
//! Returns the editable content of a component source, or a fixed
//! placeholder when no heuristic matches. A missing region is a normal
//! outcome here, not an error.

use crate::heuristics::{locate, EditableRegion};
use crate::DocumentKind;

/// Shown in place of content when no editable region is detected
pub const NO_EDITABLE_REGION: &str = "No editable region detected";

/// Result of running the fallback chain over a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction<'a> {
    Region {
        region: EditableRegion,
        content: &'a str,
    },
    Placeholder,
}

impl<'a> Extraction<'a> {
    /// Content to show the editor (the placeholder when nothing matched)
    pub fn content(&self) -> &'a str {
        match self {
            Extraction::Region { content, .. } => content,
            Extraction::Placeholder => NO_EDITABLE_REGION,
        }
    }

    pub fn region(&self) -> Option<&EditableRegion> {
        match self {
            Extraction::Region { region, .. } => Some(region),
            Extraction::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Extraction::Placeholder)
    }
}

/// Extract the editable content of `source`
pub fn extract(source: &str, kind: DocumentKind) -> Extraction<'_> {
    match locate(source, kind) {
        Some(region) => {
            let content = &source[region.range.clone()];
            Extraction::Region { region, content }
        }
        None => Extraction::Placeholder,
    }
}

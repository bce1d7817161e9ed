//! # Source Document
//!
//! A single component source file as fetched from the store.
//!
//! Documents are never cached: each operation fetches a fresh copy together
//! with the version tag the store reported for it, and that tag travels with
//! the document until the conditional write.
//!
//! ## Lifecycle
//!
//! ```text
//! Read → Extract → (edit) → Patch → Write(version tag)
//!   ↓       ↓                 ↓           ↓
//! Store   Region           Source     Store (or Conflict)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extract::{extract, Extraction};
use crate::patch::{patch, PatchOutcome};

/// Opaque revision token issued by the versioned store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(String);

impl VersionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Which fallback chain applies to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// The landing page; its chain is anchored on the outer component block
    Home,
    #[default]
    Page,
}

impl DocumentKind {
    /// Kind implied by a logical page path when none is declared
    pub fn for_logical_path(path: &str) -> Self {
        match path.trim_matches('/') {
            "" | "home" => DocumentKind::Home,
            _ => DocumentKind::Page,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Home => f.write_str("home"),
            DocumentKind::Page => f.write_str("page"),
        }
    }
}

/// Component source fetched from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// File location in the store
    pub path: String,

    /// Full file contents
    pub source: String,

    /// Revision the contents were read at
    pub version: VersionTag,
}

impl SourceDocument {
    pub fn new(path: impl Into<String>, source: impl Into<String>, version: VersionTag) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
            version,
        }
    }

    /// Editable content of this document
    pub fn extract(&self, kind: DocumentKind) -> Extraction<'_> {
        extract(&self.source, kind)
    }

    /// Rewrite the editable region of this document
    pub fn patch(&self, new_content: &str, kind: DocumentKind) -> PatchOutcome {
        patch(&self.source, new_content, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_logical_path() {
        assert_eq!(DocumentKind::for_logical_path("home"), DocumentKind::Home);
        assert_eq!(DocumentKind::for_logical_path("/"), DocumentKind::Home);
        assert_eq!(DocumentKind::for_logical_path("/home/"), DocumentKind::Home);
        assert_eq!(DocumentKind::for_logical_path("about"), DocumentKind::Page);
    }

    #[test]
    fn test_document_extract_and_patch() {
        let doc = SourceDocument::new(
            "app/about/page.tsx",
            "export default function About() { return (<p>Old</p>); }",
            VersionTag::new("abc123"),
        );

        assert_eq!(doc.extract(DocumentKind::Page).content(), "<p>Old</p>");

        let outcome = doc.patch("<p>New</p>", DocumentKind::Page);
        assert!(outcome.changed());
        assert_eq!(
            outcome.source(),
            "export default function About() { return (<p>New</p>); }"
        );
    }

    #[test]
    fn test_version_tag_is_transparent_in_json() {
        let tag = VersionTag::new("sha-1");
        assert_eq!(serde_json::to_string(&tag).unwrap(), "\"sha-1\"");
    }
}

//! # Pagesmith Editor
//!
//! Heuristic content extraction and patching for component source files.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ scan: balanced delimiters + markup tags     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ heuristics: ordered fallback chains         │
//! │  - home: component block first             │
//! │  - page: return statement first            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌──────────────────────┐ ┌────────────────────┐
//! │ extract: region text │ │ patch: rewrite it  │
//! └──────────────────────┘ └────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **No parsing**: the component language is matched, never parsed
//! 2. **One chain, two uses**: extract and patch select the same region
//! 3. **Byte-exact outside the region**: patching touches nothing else
//! 4. **Fail closed**: no match means the source is returned unchanged
//!
//! ## Usage
//!
//! ```rust
//! use pagesmith_editor::{extract, patch, DocumentKind};
//!
//! let source = r#"function Home() { return (<div className="hero">OLD</div>); }"#;
//!
//! let extraction = extract(source, DocumentKind::Page);
//! assert_eq!(extraction.content(), r#"<div className="hero">OLD</div>"#);
//!
//! let outcome = patch(source, r#"<div className="hero">NEW</div>"#, DocumentKind::Page);
//! assert!(outcome.changed());
//! assert_eq!(
//!     outcome.source(),
//!     r#"function Home() { return (<div className="hero">NEW</div>); }"#
//! );
//! ```

mod document;
mod errors;
mod extract;
mod heuristics;
mod patch;
mod scaffold;
pub mod scan;

pub use document::{DocumentKind, SourceDocument, VersionTag};
pub use errors::{EditorError, EditorResult};
pub use extract::{extract, Extraction, NO_EDITABLE_REGION};
pub use heuristics::{locate, EditableRegion, Heuristic, HOME_CHAIN, PAGE_CHAIN};
pub use patch::{patch, PatchOutcome};
pub use scaffold::{component_name, scaffold};

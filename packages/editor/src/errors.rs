//! Error types for the editor

use thiserror::Error;

use crate::DocumentKind;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// No heuristic in the chain matched; the source was left untouched
    #[error("No editable region detected in {kind} document")]
    NoEditableRegion { kind: DocumentKind },
}

pub type EditorResult<T> = Result<T, EditorError>;

//! # Versioned Store
//!
//! Persistence gateway over a store that versions every file.
//!
//! Reads always go to the store (no local cache). Writes carrying an expected
//! version update an existing file and are rejected wholesale when that
//! version is stale; writes without one create a new file. Nothing here
//! retries: writes are not idempotent, and reads can be retried by callers.

mod github;
mod memory;

pub use github::GitHubStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use pagesmith_editor::{SourceDocument, VersionTag};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("File not found in store: {path}")]
    NotFound { path: String },

    #[error("Store denied access to {path}: {message}")]
    AuthorizationDenied { path: String, message: String },

    /// The expected version is stale, or a create hit an existing file
    #[error("Version conflict writing {path}")]
    Conflict { path: String },

    #[error("Store error: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Conditional write of a whole file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub path: String,
    pub content: String,
    /// Commit message recorded by the store
    pub message: String,
    /// `None` creates the file
    pub expected_version: Option<VersionTag>,
}

impl WriteRequest {
    /// Update an existing file read at `version`
    pub fn update(
        path: impl Into<String>,
        content: impl Into<String>,
        message: impl Into<String>,
        version: VersionTag,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            message: message.into(),
            expected_version: Some(version),
        }
    }

    /// Create a file that must not exist yet
    pub fn create(
        path: impl Into<String>,
        content: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            message: message.into(),
            expected_version: None,
        }
    }

    pub fn is_create(&self) -> bool {
        self.expected_version.is_none()
    }
}

/// Outcome of an accepted write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Version of the file after the write
    pub version: VersionTag,
    /// Store-side reference for the change (a commit id)
    pub commit_ref: String,
}

#[async_trait]
pub trait VersionedStore: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Fetch the latest revision of `path`
    async fn read(&self, path: &str) -> StoreResult<SourceDocument>;

    /// Conditionally write a file
    async fn write(&self, request: WriteRequest) -> StoreResult<WriteReceipt>;
}

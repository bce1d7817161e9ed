//! In-process versioned store.
//!
//! Same optimistic-concurrency contract as the remote store, with call
//! counters so tests can assert which operations reached the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pagesmith_editor::{SourceDocument, VersionTag};
use tokio::sync::Mutex;

use super::{StoreError, StoreResult, VersionedStore, WriteReceipt, WriteRequest};

struct StoredFile {
    content: String,
    revision: u64,
}

#[derive(Default)]
struct MemoryFiles {
    files: HashMap<String, StoredFile>,
    commits: u64,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryFiles>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

fn version_of(revision: u64) -> VersionTag {
    VersionTag::new(format!("v{}", revision))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file at revision 1
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.state.get_mut().files.insert(
            path.into(),
            StoredFile {
                content: content.into(),
                revision: 1,
            },
        );
        self
    }

    /// Current content of `path`, bypassing the counters
    pub async fn content(&self, path: &str) -> Option<String> {
        let state = self.state.lock().await;
        state.files.get(path).map(|file| file.content.clone())
    }

    /// Current version of `path`, bypassing the counters
    pub async fn version(&self, path: &str) -> Option<VersionTag> {
        let state = self.state.lock().await;
        state.files.get(path).map(|file| version_of(file.revision))
    }

    /// Number of `read` calls received
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of `write` calls received, accepted or not
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Total store calls of either kind
    pub fn calls(&self) -> usize {
        self.reads() + self.writes()
    }
}

#[async_trait]
impl VersionedStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, path: &str) -> StoreResult<SourceDocument> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().await;

        let file = state.files.get(path).ok_or_else(|| StoreError::NotFound {
            path: path.to_string(),
        })?;

        Ok(SourceDocument::new(
            path,
            file.content.clone(),
            version_of(file.revision),
        ))
    }

    async fn write(&self, request: WriteRequest) -> StoreResult<WriteReceipt> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;

        let revision = match (state.files.get(&request.path), &request.expected_version) {
            (Some(file), Some(expected)) if version_of(file.revision) == *expected => {
                file.revision + 1
            }
            (None, None) => 1,
            (None, Some(_)) => {
                return Err(StoreError::NotFound { path: request.path });
            }
            (Some(_), _) => {
                return Err(StoreError::Conflict { path: request.path });
            }
        };

        state.commits += 1;
        let commit_ref = format!("commit-{}", state.commits);
        state.files.insert(
            request.path,
            StoredFile {
                content: request.content,
                revision,
            },
        );

        Ok(WriteReceipt {
            version: version_of(revision),
            commit_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_file() {
        let store = MemoryStore::new();
        assert_eq!(
            store.read("app/page.tsx").await,
            Err(StoreError::NotFound {
                path: "app/page.tsx".to_string()
            })
        );
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn test_update_advances_version() {
        let store = MemoryStore::new().with_file("a.tsx", "one");
        let doc = store.read("a.tsx").await.unwrap();
        assert_eq!(doc.version.as_str(), "v1");

        let receipt = store
            .write(WriteRequest::update("a.tsx", "two", "edit", doc.version))
            .await
            .unwrap();
        assert_eq!(receipt.version.as_str(), "v2");
        assert_eq!(receipt.commit_ref, "commit-1");
        assert_eq!(store.content("a.tsx").await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_stale_version_rejected_wholesale() {
        let store = MemoryStore::new().with_file("a.tsx", "one");
        let first = store.read("a.tsx").await.unwrap();
        let second = store.read("a.tsx").await.unwrap();

        store
            .write(WriteRequest::update("a.tsx", "first", "edit", first.version))
            .await
            .unwrap();
        let result = store
            .write(WriteRequest::update("a.tsx", "second", "edit", second.version))
            .await;

        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        assert_eq!(store.content("a.tsx").await.as_deref(), Some("first"));
        assert_eq!(store.version("a.tsx").await, Some(VersionTag::from("v2")));
        assert_eq!(store.writes(), 2);
    }

    #[tokio::test]
    async fn test_create_rules() {
        let store = MemoryStore::new().with_file("exists.tsx", "x");

        let created = store
            .write(WriteRequest::create("new.tsx", "hello", "create"))
            .await
            .unwrap();
        assert_eq!(created.version.as_str(), "v1");

        let clash = store
            .write(WriteRequest::create("exists.tsx", "y", "create"))
            .await;
        assert!(matches!(clash, Err(StoreError::Conflict { .. })));

        let missing = store
            .write(WriteRequest::update("gone.tsx", "z", "edit", "v1".into()))
            .await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }
}

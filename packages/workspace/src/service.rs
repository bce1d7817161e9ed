//! # Content Service
//!
//! The two operations exposed to editors, independent of any transport.
//!
//! ## Save flow
//!
//! ```text
//! validate input → authorize → resolve → read → patch | scaffold → conditional write
//! ```
//!
//! Authorization happens before the store is touched. A read that finds no
//! file turns the save into a create from a scaffold; otherwise the patch
//! must locate a region or the save fails without writing. Conflicts are
//! returned to the caller as-is, never retried.

use std::sync::Arc;

use pagesmith_editor::{scaffold, DocumentKind, EditorError, VersionTag};
use serde::Serialize;
use thiserror::Error;

use crate::auth::{
    AuthError, CredentialValidator, SignedTokenValidator, UnsignedClaimsValidator,
};
use crate::config::{ConfigResult, CredentialScheme, WorkspaceConfig};
use crate::resolver::PageMapping;
use crate::store::{GitHubStore, StoreError, VersionedStore, WriteRequest};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("No page is mapped at {path}")]
    UnmappedPage { path: String },

    #[error("Page file not found in store: {file}")]
    MissingDocument { file: String },

    #[error("Authorization failed: {0}")]
    Authorization(#[from] AuthError),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("No editable region in {file}")]
    PatchFailure { file: String, kind: DocumentKind },

    #[error("{file} changed since it was read")]
    Conflict { file: String },

    #[error("Store failure: {0}")]
    Store(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::UnmappedPage { .. } | ServiceError::MissingDocument { .. } => 404,
            ServiceError::Authorization(e) if e.is_forbidden() => 403,
            ServiceError::Authorization(_) => 401,
            ServiceError::Validation(_) => 400,
            ServiceError::PatchFailure { .. } => 422,
            ServiceError::Conflict { .. } => 409,
            ServiceError::Store(_) => 502,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::UnmappedPage { .. } | ServiceError::MissingDocument { .. } => {
                "not_found"
            }
            ServiceError::Authorization(_) => "authorization",
            ServiceError::Validation(_) => "validation",
            ServiceError::PatchFailure { .. } => "patch_failure",
            ServiceError::Conflict { .. } => "conflict",
            ServiceError::Store(_) => "store",
        }
    }

    /// Message shown to the editor, telling them what to do next
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::UnmappedPage { path } => {
                format!("There is no editable page at '{}'.", path)
            }
            ServiceError::MissingDocument { .. } => {
                "This page has no content yet. Save to create it.".to_string()
            }
            ServiceError::Authorization(AuthError::MissingCredential) => {
                "Sign in to save changes.".to_string()
            }
            ServiceError::Authorization(AuthError::Expired { .. }) => {
                "Your session has expired. Sign in again to save changes.".to_string()
            }
            ServiceError::Authorization(AuthError::InsufficientRole { required, .. }) => {
                format!("Saving requires the '{}' role.", required)
            }
            ServiceError::Authorization(_) => {
                "Your credential could not be read. Sign in again.".to_string()
            }
            ServiceError::Validation(reason) => format!("The request is incomplete: {}.", reason),
            ServiceError::PatchFailure { .. } => {
                "This page's layout has no region the editor recognises; nothing was saved."
                    .to_string()
            }
            ServiceError::Conflict { .. } => {
                "Someone else saved this page first. Reload it and apply your edit again."
                    .to_string()
            }
            ServiceError::Store(_) => {
                "The content store is unavailable. Try again later.".to_string()
            }
        }
    }

    fn from_store(error: StoreError, file: &str) -> Self {
        match error {
            StoreError::NotFound { .. } => ServiceError::MissingDocument {
                file: file.to_string(),
            },
            StoreError::Conflict { .. } => ServiceError::Conflict {
                file: file.to_string(),
            },
            StoreError::AuthorizationDenied { message, .. } => {
                ServiceError::Store(format!("store denied access to {}: {}", file, message))
            }
            StoreError::Other(message) => ServiceError::Store(message),
        }
    }
}

/// Editable content of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    /// Logical page path
    pub path: String,
    /// Component file in the store
    pub file: String,
    pub title: String,
    /// Region text, or the placeholder when nothing is editable
    pub content: String,
    pub editable: bool,
    pub version: VersionTag,
}

/// A save from an editor
#[derive(Debug, Clone, Default)]
pub struct SaveRequest {
    pub path: String,
    pub content: String,
    pub title: Option<String>,
    /// Commit message; a default is derived from the title
    pub message: Option<String>,
    pub credential: Option<String>,
    /// Version the editor loaded; when set, the write is conditional on it
    /// instead of on the version read during the save
    pub base_version: Option<VersionTag>,
}

impl SaveRequest {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_base_version(mut self, version: VersionTag) -> Self {
        self.base_version = Some(version);
        self
    }

    fn check(&self) -> ServiceResult<()> {
        if self.path.trim().is_empty() {
            return Err(ServiceError::Validation("path is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(ServiceError::Validation("content is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    /// Component file written
    pub path: String,
    pub commit_ref: String,
    pub version: VersionTag,
    /// Whether the file was created from a scaffold
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub path: String,
    pub file: String,
    pub title: String,
    pub kind: DocumentKind,
}

#[derive(Clone)]
pub struct ContentService {
    pages: Arc<PageMapping>,
    store: Arc<dyn VersionedStore>,
    validator: Arc<dyn CredentialValidator>,
}

impl ContentService {
    pub fn new(
        pages: Arc<PageMapping>,
        store: Arc<dyn VersionedStore>,
        validator: Arc<dyn CredentialValidator>,
    ) -> Self {
        Self {
            pages,
            store,
            validator,
        }
    }

    /// Wire the GitHub store and the configured credential scheme.
    /// Secrets are read from the environment variables the config names.
    pub fn from_config(config: &WorkspaceConfig) -> ConfigResult<Self> {
        let pages = PageMapping::new(config.pages.clone())?;
        let store = GitHubStore::from_config(&config.store, config.store.token()?);

        let validator: Arc<dyn CredentialValidator> = match config.auth.scheme {
            CredentialScheme::Unsigned => {
                tracing::warn!("unsigned credentials are not cryptographically verified");
                Arc::new(UnsignedClaimsValidator::new(&config.auth.required_role))
            }
            CredentialScheme::Signed => Arc::new(SignedTokenValidator::new(
                &config.auth.secret()?,
                &config.auth.required_role,
            )),
        };

        Ok(Self::new(Arc::new(pages), Arc::new(store), validator))
    }

    pub fn pages(&self) -> &PageMapping {
        &self.pages
    }

    pub fn list_pages(&self) -> Vec<PageSummary> {
        self.pages
            .entries()
            .iter()
            .map(|entry| PageSummary {
                path: entry.path.clone(),
                file: entry.file.clone(),
                title: self.pages.title_for(&entry.path),
                kind: entry.kind(),
            })
            .collect()
    }

    /// Fetch the editable content of a page
    pub async fn get_content(&self, logical_path: &str) -> ServiceResult<ContentView> {
        let page = self
            .pages
            .resolve(logical_path)
            .ok_or_else(|| ServiceError::UnmappedPage {
                path: logical_path.to_string(),
            })?;

        let document = self
            .store
            .read(page.file)
            .await
            .map_err(|e| ServiceError::from_store(e, page.file))?;

        let extraction = document.extract(page.kind);
        tracing::info!(
            path = logical_path,
            file = page.file,
            version = %document.version,
            editable = !extraction.is_placeholder(),
            "content loaded"
        );

        Ok(ContentView {
            path: logical_path.to_string(),
            file: page.file.to_string(),
            title: self.pages.title_for(logical_path),
            content: extraction.content().to_string(),
            editable: !extraction.is_placeholder(),
            version: document.version.clone(),
        })
    }

    /// Replace the editable content of a page, creating it when missing
    pub async fn save_content(&self, request: SaveRequest) -> ServiceResult<SaveReceipt> {
        request.check()?;

        let claims = self
            .validator
            .validate(request.credential.as_deref())
            .map_err(|e| {
                tracing::warn!(path = %request.path, reason = e.reason(), "save rejected");
                ServiceError::Authorization(e)
            })?;

        let page = self
            .pages
            .resolve(&request.path)
            .ok_or_else(|| ServiceError::UnmappedPage {
                path: request.path.clone(),
            })?;
        let title = request
            .title
            .clone()
            .unwrap_or_else(|| self.pages.title_for(&request.path));

        let write = match self.store.read(page.file).await {
            Ok(document) => {
                let source = document
                    .patch(&request.content, page.kind)
                    .into_result(page.kind)
                    .map_err(|e| match e {
                        EditorError::NoEditableRegion { kind } => {
                            tracing::warn!(file = page.file, %kind, "patch found no region");
                            ServiceError::PatchFailure {
                                file: page.file.to_string(),
                                kind,
                            }
                        }
                    })?;
                let expected = request.base_version.clone().unwrap_or(document.version);
                let message = request
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Update {} content", title));
                WriteRequest::update(page.file, source, message, expected)
            }
            Err(StoreError::NotFound { .. }) => {
                tracing::info!(file = page.file, "creating page from scaffold");
                let message = request
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Create {}", title));
                WriteRequest::create(page.file, scaffold(&title, &request.content), message)
            }
            Err(e) => {
                tracing::error!(
                    file = page.file,
                    store = self.store.name(),
                    error = %e,
                    "read failed"
                );
                return Err(ServiceError::from_store(e, page.file));
            }
        };

        let created = write.is_create();
        let store = Arc::clone(&self.store);
        let file = page.file.to_string();
        let path = request.path.clone();
        let editor = claims.sub.clone();

        // An issued write runs to completion even if the caller is dropped
        let task = tokio::spawn(async move {
            let result = store.write(write).await;
            match &result {
                Ok(receipt) => tracing::info!(
                    %path,
                    %file,
                    %editor,
                    commit = %receipt.commit_ref,
                    created,
                    "content saved"
                ),
                Err(StoreError::Conflict { .. }) => {
                    tracing::warn!(%file, "write rejected: version conflict")
                }
                Err(e) => tracing::error!(
                    %file,
                    store = store.name(),
                    error = %e,
                    "write failed"
                ),
            }
            result
        });

        let receipt = task
            .await
            .map_err(|e| ServiceError::Store(format!("write task failed: {}", e)))?
            .map_err(|e| ServiceError::from_store(e, page.file))?;

        Ok(SaveReceipt {
            path: page.file.to_string(),
            commit_ref: receipt.commit_ref,
            version: receipt.version,
            created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_distinct_per_kind() {
        let cases = [
            (ServiceError::UnmappedPage { path: "/x".into() }, 404),
            (ServiceError::Authorization(AuthError::MissingCredential), 401),
            (
                ServiceError::Authorization(AuthError::InsufficientRole {
                    required: "admin".into(),
                    actual: "viewer".into(),
                }),
                403,
            ),
            (ServiceError::Validation("content is required".into()), 400),
            (
                ServiceError::PatchFailure {
                    file: "a.tsx".into(),
                    kind: DocumentKind::Page,
                },
                422,
            ),
            (ServiceError::Conflict { file: "a.tsx".into() }, 409),
            (ServiceError::Store("boom".into()), 502),
        ];

        for (error, status) in cases {
            assert_eq!(error.status_code(), status, "{:?}", error);
            assert!(!error.user_message().is_empty());
        }
    }

    #[test]
    fn test_store_error_mapping() {
        assert_eq!(
            ServiceError::from_store(StoreError::Conflict { path: "a".into() }, "a.tsx"),
            ServiceError::Conflict {
                file: "a.tsx".into()
            }
        );
        assert_eq!(
            ServiceError::from_store(StoreError::NotFound { path: "a".into() }, "a.tsx").kind(),
            "not_found"
        );
        assert_eq!(
            ServiceError::from_store(
                StoreError::AuthorizationDenied {
                    path: "a".into(),
                    message: "bad token".into()
                },
                "a.tsx"
            )
            .status_code(),
            502
        );
    }

    #[test]
    fn test_save_request_validation() {
        assert!(SaveRequest::new("/about", "<p>x</p>").check().is_ok());
        assert!(matches!(
            SaveRequest::new("", "<p>x</p>").check(),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            SaveRequest::new("/about", "  \n").check(),
            Err(ServiceError::Validation(_))
        ));
    }
}

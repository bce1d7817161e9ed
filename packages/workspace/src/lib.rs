//! # Pagesmith Workspace
//!
//! Everything between an editor request and the versioned store: page
//! resolution, credential checks, the persistence gateway and the
//! [`ContentService`] that ties them together, plus its HTTP transport.

pub mod auth;
pub mod config;
pub mod http;
pub mod resolver;
pub mod service;
pub mod store;

pub use auth::{
    AuthError, AuthResult, Claims, CredentialValidator, SignedTokenValidator,
    UnsignedClaimsValidator,
};
pub use config::{
    AuthConfig, ConfigError, ConfigResult, CredentialScheme, PageEntry, ServerConfig,
    StoreConfig, WorkspaceConfig, DEFAULT_CONFIG_NAME,
};
pub use resolver::{normalize_path, PageMapping, ResolvedPage};
pub use service::{
    ContentService, ContentView, PageSummary, SaveReceipt, SaveRequest, ServiceError,
    ServiceResult,
};
pub use store::{
    GitHubStore, MemoryStore, StoreError, StoreResult, VersionedStore, WriteReceipt,
    WriteRequest,
};

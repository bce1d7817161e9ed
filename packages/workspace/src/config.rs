use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use pagesmith_editor::DocumentKind;

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate page path: {0}")]
    DuplicatePage(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Pagesmith configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Logical page path to component file table
    pub pages: Vec<PageEntry>,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// One editable page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    /// Logical path as the site routes it (`/about`)
    pub path: String,

    /// Component source file in the store
    pub file: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Overrides the kind inferred from the logical path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
}

impl PageEntry {
    pub fn new(path: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file: file.into(),
            title: None,
            kind: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
            .unwrap_or_else(|| DocumentKind::for_logical_path(&self.path))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the store access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "PAGESMITH_STORE_TOKEN".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo: String::new(),
            branch: default_branch(),
            api_url: default_api_url(),
            token_env: default_token_env(),
        }
    }
}

impl StoreConfig {
    pub fn token(&self) -> ConfigResult<String> {
        std::env::var(&self.token_env).map_err(|_| ConfigError::MissingEnv(self.token_env.clone()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    /// Base64 JSON claims, not cryptographically verified
    #[default]
    Unsigned,
    /// HS256 signed token
    Signed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    #[serde(default = "default_required_role")]
    pub required_role: String,

    #[serde(default)]
    pub scheme: CredentialScheme,

    /// Environment variable holding the signing secret (signed scheme only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_env: Option<String>,
}

fn default_required_role() -> String {
    "admin".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            required_role: default_required_role(),
            scheme: CredentialScheme::default(),
            secret_env: None,
        }
    }
}

impl AuthConfig {
    pub fn secret(&self) -> ConfigResult<String> {
        let name = self
            .secret_env
            .clone()
            .unwrap_or_else(|| "PAGESMITH_AUTH_SECRET".to_string());
        std::env::var(&name).map_err(|_| ConfigError::MissingEnv(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl WorkspaceConfig {
    /// Load `pagesmith.config.json` from a directory
    pub fn load(cwd: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_file(cwd.as_ref().join(DEFAULT_CONFIG_NAME))
    }

    /// Load a config file by path
    pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: WorkspaceConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), pages = config.pages.len(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "pages": [
                { "path": "/", "file": "app/page.tsx", "title": "Home" },
                { "path": "/about", "file": "app/about/page.tsx" },
                { "path": "/landing", "file": "app/landing.tsx", "kind": "home" }
            ],
            "store": { "owner": "acme", "repo": "site", "branch": "prod" },
            "auth": { "requiredRole": "editor", "scheme": "signed", "secretEnv": "SITE_SECRET" },
            "server": { "port": 8080 }
        }"#;

        let config: WorkspaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.pages.len(), 3);
        assert_eq!(config.pages[0].kind(), DocumentKind::Home);
        assert_eq!(config.pages[1].kind(), DocumentKind::Page);
        assert_eq!(config.pages[2].kind(), DocumentKind::Home);
        assert_eq!(config.store.owner, "acme");
        assert_eq!(config.store.branch, "prod");
        assert_eq!(config.store.api_url, "https://api.github.com");
        assert_eq!(config.auth.required_role, "editor");
        assert_eq!(config.auth.scheme, CredentialScheme::Signed);
        assert_eq!(config.auth.secret_env.as_deref(), Some("SITE_SECRET"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_defaults() {
        let config: WorkspaceConfig = serde_json::from_str(r#"{ "pages": [] }"#).unwrap();
        assert_eq!(config.store.branch, "main");
        assert_eq!(config.store.token_env, "PAGESMITH_STORE_TOKEN");
        assert_eq!(config.auth.required_role, "admin");
        assert_eq!(config.auth.scheme, CredentialScheme::Unsigned);
        assert_eq!(config.server.port, 3030);
    }

    #[test]
    fn test_missing_pages_is_an_error() {
        assert!(serde_json::from_str::<WorkspaceConfig>("{}").is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "pages": [{ "path": "/pricing", "file": "pricing.tsx" }] }"#,
        )
        .unwrap();

        let config = WorkspaceConfig::load(dir.path()).unwrap();
        assert_eq!(config.pages[0].file, "pricing.tsx");

        let missing = WorkspaceConfig::load(dir.path().join("nope"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}

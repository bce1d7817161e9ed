//! GitHub contents API store.
//!
//! The blob sha reported by the API is the version tag; a `PUT` carrying a
//! stale sha is rejected by GitHub with 409, and a create that collides with
//! an existing file with 422.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pagesmith_editor::{SourceDocument, VersionTag};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{StoreError, StoreResult, VersionedStore, WriteReceipt, WriteRequest};
use crate::config::StoreConfig;

const USER_AGENT: &str = concat!("pagesmith/", env!("CARGO_PKG_VERSION"));

/// Store backed by one branch of a GitHub repository.
pub struct GitHubStore {
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
    token: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
    commit: PutCommit,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PutCommit {
    sha: String,
}

impl GitHubStore {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            token: token.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Build from config; the token comes from the environment
    pub fn from_config(config: &StoreConfig, token: impl Into<String>) -> Self {
        Self::new(&config.owner, &config.repo, &config.branch, token).with_api_url(&config.api_url)
    }

    /// Point at a different API root (GitHub Enterprise)
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Contents endpoint for `path`, each segment percent-encoded
    fn contents_url(&self, path: &str) -> StoreResult<reqwest::Url> {
        let invalid = || StoreError::Other(format!("Invalid API URL: {}", self.api_url));
        let mut url = reqwest::Url::parse(&self.api_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str(), "contents"])
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    fn request(&self, method: reqwest::Method, url: reqwest::Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.token)
            .header("accept", "application/vnd.github+json")
            .header("user-agent", USER_AGENT)
            .header("x-github-api-version", "2022-11-28")
    }
}

/// Map a non-success response to the gateway error taxonomy
fn classify(status: StatusCode, path: &str, body: &str) -> StoreError {
    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            path: path.to_string(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::AuthorizationDenied {
            path: path.to_string(),
            message: body.to_string(),
        },
        StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => StoreError::Conflict {
            path: path.to_string(),
        },
        other => StoreError::Other(format!("GitHub API error {}: {}", other, body)),
    }
}

/// Decode the base64 payload of a contents response (GitHub wraps it at 60
/// columns)
fn decode_content(encoded: &str) -> StoreResult<String> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| StoreError::Other(format!("Invalid base64 content: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Other(format!("File is not UTF-8: {}", e)))
}

async fn error_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string())
}

#[async_trait]
impl VersionedStore for GitHubStore {
    fn name(&self) -> &str {
        "github"
    }

    async fn read(&self, path: &str) -> StoreResult<SourceDocument> {
        let url = self.contents_url(path)?;
        tracing::debug!(%url, branch = %self.branch, "fetching file");

        let response = self
            .request(reqwest::Method::GET, url)
            .query(&[("ref", &self.branch)])
            .send()
            .await
            .map_err(|e| StoreError::Other(format!("Failed to call GitHub API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(classify(status, path, &body));
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("Failed to parse GitHub response: {}", e)))?;

        if contents.encoding != "base64" {
            return Err(StoreError::Other(format!(
                "Unsupported content encoding '{}' for {}",
                contents.encoding, path
            )));
        }

        let source = decode_content(&contents.content)?;
        Ok(SourceDocument::new(path, source, VersionTag::new(contents.sha)))
    }

    async fn write(&self, request: WriteRequest) -> StoreResult<WriteReceipt> {
        let mut body = serde_json::json!({
            "message": request.message,
            "content": STANDARD.encode(request.content.as_bytes()),
            "branch": self.branch,
        });
        if let Some(version) = &request.expected_version {
            body["sha"] = serde_json::json!(version.as_str());
        }

        let response = self
            .request(reqwest::Method::PUT, self.contents_url(&request.path)?)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Other(format!("Failed to call GitHub API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(classify(status, &request.path, &body));
        }

        let put: PutResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Other(format!("Failed to parse GitHub response: {}", e)))?;

        Ok(WriteReceipt {
            version: VersionTag::new(put.content.sha),
            commit_ref: put.commit.sha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contents_url() {
        let store = GitHubStore::new("acme", "site", "main", "token")
            .with_api_url("https://github.example.com/api/v3/");
        assert_eq!(
            store.contents_url("/app/about/page.tsx").unwrap().as_str(),
            "https://github.example.com/api/v3/repos/acme/site/contents/app/about/page.tsx"
        );

        let store = GitHubStore::new("acme", "site", "main", "token");
        assert_eq!(
            store.contents_url("app/blog/page #2.tsx").unwrap().as_str(),
            "https://api.github.com/repos/acme/site/contents/app/blog/page%20%232.tsx"
        );

        let broken = GitHubStore::new("acme", "site", "main", "token").with_api_url("not a url");
        assert!(broken.contents_url("app/page.tsx").is_err());
    }

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(
            classify(StatusCode::NOT_FOUND, "a.tsx", ""),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            classify(StatusCode::FORBIDDEN, "a.tsx", "rate limited"),
            StoreError::AuthorizationDenied { message, .. } if message == "rate limited"
        ));
        assert!(matches!(
            classify(StatusCode::UNAUTHORIZED, "a.tsx", ""),
            StoreError::AuthorizationDenied { .. }
        ));
        assert!(matches!(
            classify(StatusCode::CONFLICT, "a.tsx", ""),
            StoreError::Conflict { .. }
        ));
        assert!(matches!(
            classify(StatusCode::UNPROCESSABLE_ENTITY, "a.tsx", ""),
            StoreError::Conflict { .. }
        ));
        assert!(matches!(
            classify(StatusCode::BAD_GATEWAY, "a.tsx", "upstream"),
            StoreError::Other(_)
        ));
    }

    #[test]
    fn test_decode_wrapped_content() {
        let encoded = STANDARD.encode("export default function Home() {}\n");
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\n{}\n", head, tail);
        assert_eq!(
            decode_content(&wrapped).unwrap(),
            "export default function Home() {}\n"
        );
        assert!(decode_content("!!!").is_err());
    }

    mod api {
        use super::*;
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, header, method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const FILE: &str = "/repos/acme/site/contents/app/page.tsx";
        const SOURCE: &str = "export default function Home() {\n  return (<main>Hi</main>);\n}\n";

        fn store(server: &MockServer, branch: &str) -> GitHubStore {
            GitHubStore::new("acme", "site", branch, "secret-token").with_api_url(server.uri())
        }

        fn put_response(blob: &str, commit: &str) -> serde_json::Value {
            json!({ "content": { "sha": blob }, "commit": { "sha": commit } })
        }

        #[tokio::test]
        async fn test_read_decodes_content_on_branch() {
            let server = MockServer::start().await;
            let encoded = STANDARD.encode(SOURCE);
            let (head, tail) = encoded.split_at(30);

            Mock::given(method("GET"))
                .and(path(FILE))
                .and(query_param("ref", "release&hotfix"))
                .and(header("authorization", "Bearer secret-token"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "sha": "abc123",
                    "content": format!("{}\n{}\n", head, tail),
                    "encoding": "base64",
                })))
                .expect(1)
                .mount(&server)
                .await;

            let document = store(&server, "release&hotfix")
                .read("app/page.tsx")
                .await
                .unwrap();
            assert_eq!(document.source, SOURCE);
            assert_eq!(document.version.as_str(), "abc123");
        }

        #[tokio::test]
        async fn test_read_failures() {
            let server = MockServer::start().await;

            Mock::given(method("GET"))
                .and(path("/repos/acme/site/contents/app/missing.tsx"))
                .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/repos/acme/site/contents/app/huge.tsx"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "sha": "big",
                    "content": "",
                    "encoding": "none",
                })))
                .mount(&server)
                .await;

            let store = store(&server, "main");
            assert!(matches!(
                store.read("app/missing.tsx").await,
                Err(StoreError::NotFound { path }) if path == "app/missing.tsx"
            ));
            assert!(matches!(
                store.read("app/huge.tsx").await,
                Err(StoreError::Other(message)) if message.contains("'none'")
            ));
        }

        #[tokio::test]
        async fn test_update_sends_expected_sha() {
            let server = MockServer::start().await;

            Mock::given(method("PUT"))
                .and(path(FILE))
                .and(body_partial_json(json!({
                    "message": "Update Home content",
                    "content": STANDARD.encode(SOURCE),
                    "branch": "main",
                    "sha": "abc123",
                })))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(put_response("def456", "c0ffee")),
                )
                .expect(1)
                .mount(&server)
                .await;

            let receipt = store(&server, "main")
                .write(WriteRequest::update(
                    "app/page.tsx",
                    SOURCE,
                    "Update Home content",
                    VersionTag::new("abc123"),
                ))
                .await
                .unwrap();

            assert_eq!(receipt.version.as_str(), "def456");
            assert_eq!(receipt.commit_ref, "c0ffee");
        }

        #[tokio::test]
        async fn test_create_omits_sha() {
            let server = MockServer::start().await;

            Mock::given(method("PUT"))
                .and(path("/repos/acme/site/contents/app/careers/page.tsx"))
                .respond_with(
                    ResponseTemplate::new(201).set_body_json(put_response("new1", "beef")),
                )
                .expect(1)
                .mount(&server)
                .await;

            let receipt = store(&server, "main")
                .write(WriteRequest::create("app/careers/page.tsx", SOURCE, "Create Careers"))
                .await
                .unwrap();
            assert_eq!(receipt.commit_ref, "beef");

            let requests = server.received_requests().await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
            assert!(body.get("sha").is_none());
            assert_eq!(body["message"], "Create Careers");
        }

        #[tokio::test]
        async fn test_stale_sha_is_a_conflict() {
            let server = MockServer::start().await;

            Mock::given(method("PUT"))
                .and(path(FILE))
                .respond_with(
                    ResponseTemplate::new(409)
                        .set_body_string(r#"{"message":"app/page.tsx does not match abc123"}"#),
                )
                .mount(&server)
                .await;

            let result = store(&server, "main")
                .write(WriteRequest::update(
                    "app/page.tsx",
                    SOURCE,
                    "Update Home content",
                    VersionTag::new("abc123"),
                ))
                .await;
            assert_eq!(
                result,
                Err(StoreError::Conflict {
                    path: "app/page.tsx".to_string()
                })
            );
        }
    }
}

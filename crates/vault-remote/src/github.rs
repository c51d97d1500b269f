//! GitHub Contents API implementation of [`RemoteHost`]
//!
//! Talks to `/repos/{owner}/{repo}/contents/{path}` with a bearer token and a
//! fixed branch reference. The API base is configurable so tests and GitHub
//! Enterprise deployments can point elsewhere.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use vault_store::RemoteCoords;

use crate::error::{Error, Result};
use crate::host::{EntryKind, HostFactory, RemoteBlob, RemoteEntry, RemoteHost, VersionToken};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = concat!("vault-sync/", env!("CARGO_PKG_VERSION"));

/// Factory producing [`GitHubHost`] instances per tenant coordinates.
///
/// Holds the shared HTTP client (connection pool, request timeout) and the
/// deployment-level settings; per-tenant token and repository come from the
/// [`RemoteCoords`] at open time.
pub struct GitHubHostFactory {
    http: reqwest::Client,
    api_base: String,
    branch: String,
}

impl GitHubHostFactory {
    /// Factory against the public GitHub API, branch `main`, default timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(DEFAULT_API_BASE, DEFAULT_BRANCH, DEFAULT_TIMEOUT)
    }

    /// Factory with an explicit API base, branch reference, and per-request
    /// timeout. Every in-flight call fails once the timeout expires, which
    /// aborts the surrounding reconciliation or seed walk.
    pub fn with_options(
        api_base: impl Into<String>,
        branch: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            branch: branch.into(),
        })
    }
}

impl HostFactory for GitHubHostFactory {
    fn open(&self, coords: &RemoteCoords) -> Arc<dyn RemoteHost> {
        Arc::new(GitHubHost {
            http: self.http.clone(),
            api_base: self.api_base.clone(),
            branch: self.branch.clone(),
            token: coords.credential.clone(),
            owner: coords.repo_owner.clone(),
            repo: coords.repo_name.clone(),
        })
    }
}

/// [`RemoteHost`] scoped to one GitHub repository and branch.
pub struct GitHubHost {
    http: reqwest::Client,
    api_base: String,
    branch: String,
    token: String,
    owner: String,
    repo: String,
}

/// GET response for a file under `/contents/` (directories return an array
/// and fail to parse into this shape).
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// PUT response: `{"content": {"sha": ...}, "commit": {...}}`.
#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: Option<WrittenContent>,
}

#[derive(Debug, Deserialize)]
struct WrittenContent {
    sha: String,
}

impl GitHubHost {
    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.owner,
            self.repo,
            encode_path(path)
        )
    }

    async fn send_get(&self, path: &str) -> Result<reqwest::Response> {
        let response = self
            .http
            .get(self.contents_url(path))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[("ref", self.branch.as_str())])
            .send()
            .await?;
        check_status(path, response)
    }

    async fn send_put(&self, path: &str, body: serde_json::Value) -> Result<VersionToken> {
        let response = self
            .http
            .put(self.contents_url(path))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body)
            .send()
            .await?;
        let response = check_status(path, response)?;
        let body: WriteResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        match body.content {
            Some(written) => Ok(VersionToken::new(written.sha)),
            None => Err(Error::malformed(path, "write response missing content sha")),
        }
    }
}

#[async_trait::async_trait]
impl RemoteHost for GitHubHost {
    async fn get_content(&self, path: &str) -> Result<RemoteBlob> {
        let response = self.send_get(path).await?;
        let body: ContentsResponse = response
            .json()
            .await
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        let content = decode_blob(path, body.content.as_deref().unwrap_or(""))?;
        Ok(RemoteBlob {
            content,
            version: VersionToken::new(body.sha),
        })
    }

    async fn create_content(
        &self,
        path: &str,
        content: &str,
        message: &str,
    ) -> Result<VersionToken> {
        self.send_put(
            path,
            json!({
                "message": message,
                "content": BASE64.encode(content.as_bytes()),
                "branch": self.branch,
            }),
        )
        .await
    }

    async fn update_content(
        &self,
        path: &str,
        content: &str,
        expected: &VersionToken,
        message: &str,
    ) -> Result<VersionToken> {
        self.send_put(
            path,
            json!({
                "message": message,
                "content": BASE64.encode(content.as_bytes()),
                "branch": self.branch,
                "sha": expected.as_str(),
            }),
        )
        .await
    }

    async fn delete_content(
        &self,
        path: &str,
        expected: &VersionToken,
        message: &str,
    ) -> Result<()> {
        let response = self
            .http
            .delete(self.contents_url(path))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&json!({
                "message": message,
                "sha": expected.as_str(),
                "branch": self.branch,
            }))
            .send()
            .await?;
        check_status(path, response)?;
        Ok(())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<RemoteEntry>> {
        let response = self.send_get(path).await?;
        let entries: Vec<DirEntry> = response
            .json()
            .await
            .map_err(|e| Error::malformed(path, e.to_string()))?;
        Ok(entries
            .into_iter()
            .map(|entry| RemoteEntry {
                name: entry.name,
                kind: match entry.kind.as_str() {
                    "file" => EntryKind::File,
                    "dir" => EntryKind::Dir,
                    _ => EntryKind::Other,
                },
            })
            .collect())
    }
}

/// Map an error status to the taxonomy; pass successful responses through.
fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(Error::not_found(path)),
        StatusCode::CONFLICT => Err(Error::conflict(path)),
        status => Err(Error::RemoteApi {
            path: path.to_string(),
            status: status.as_u16(),
        }),
    }
}

/// Percent-encode each path segment, preserving `/` separators.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a base64 content blob. The Contents API embeds newlines in the
/// base64 payload, so whitespace is stripped first.
fn decode_blob(path: &str, raw: &str) -> Result<String> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| Error::malformed(path, format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::malformed(path, format!("content is not UTF-8: {e}")))
}

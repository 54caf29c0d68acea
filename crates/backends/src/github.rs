// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hosted-file content store: `content.json` committed to a GitHub
//! repository through the contents API.
//!
//! The version token is the file's blob SHA. A `PUT` carrying a stale SHA is
//! answered with 409 (or 422 "... does not match ..."), which maps to
//! `BackendError::VersionMismatch`. Every successful write is a commit on
//! the configured branch; the site's deploy pipeline picks it up from there.

use crate::error::{BackendError, Result};
use crate::http;
use crate::store::{ContentStore, VersionToken, Versioned, encode_document};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use content::ContentDocument;
use diagnostics::*;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const API_VERSION: &str = "2022-11-28";

/// Repository coordinates and credentials.
///
/// ```yaml
/// github:
///   owner: "simmons-civil"
///   repo: "site"
///   branch: "main"
///   path: "public/content.json"
/// ```
/// `token` is normally supplied through the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GitHubConfig {
    pub owner: Option<String>,
    pub repo: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub branch: String,
    pub path: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            owner: None,
            repo: None,
            token: None,
            branch: "main".to_string(),
            path: "public/content.json".to_string(),
            api_url: "https://api.github.com".to_string(),
            timeout_secs: http::default_timeout_secs(),
        }
    }
}

struct Target<'a> {
    url: String,
    token: &'a str,
}

#[derive(Deserialize)]
struct ContentsEntry {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: String,
}

#[derive(Serialize)]
struct PutContents<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

#[derive(Deserialize)]
struct PutResponse {
    content: Option<PutEntry>,
}

#[derive(Deserialize)]
struct PutEntry {
    sha: String,
}

pub struct GitHubStore {
    config: GitHubConfig,
    http: reqwest::Client,
}

impl GitHubStore {
    pub fn new(config: GitHubConfig) -> Result<Self> {
        let http = http::client(config.timeout_secs)?;
        Ok(Self { config, http })
    }

    #[must_use]
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Resolve the contents URL, failing with a descriptive error when any
    /// required setting is missing.
    fn target(&self) -> Result<Target<'_>> {
        let token = setting(&self.config.token);
        let owner = setting(&self.config.owner);
        let repo = setting(&self.config.repo);
        match (token, owner, repo) {
            (Some(token), Some(owner), Some(repo)) => Ok(Target {
                url: Self::contents_url(&self.config.api_url, owner, repo, &self.config.path),
                token,
            }),
            _ => {
                let missing: Vec<&str> = [("token", token), ("owner", owner), ("repo", repo)]
                    .into_iter()
                    .filter_map(|(name, value)| value.is_none().then_some(name))
                    .collect();
                Err(BackendError::missing("GitHub", &missing))
            }
        }
    }

    fn contents_url(api_url: &str, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{owner}/{repo}/contents/{}",
            api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: reqwest::Method, target: &Target<'_>) -> reqwest::RequestBuilder {
        self.http
            .request(method, &target.url)
            .bearer_auth(target.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// GET the contents entry; `None` when the file does not exist yet.
    async fn fetch(&self) -> Result<Option<ContentsEntry>> {
        let target = self.target()?;
        debug!("github: GET {url}", url: target.url.as_str());
        let response = self
            .request(reqwest::Method::GET, &target)
            .query(&[("ref", self.config.branch.as_str())])
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = http::expect_success(response).await?;
        Ok(Some(http::json_body(response).await?))
    }
}

fn setting(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn decode_entry(entry: &ContentsEntry) -> Result<ContentDocument> {
    if entry.encoding != "base64" {
        return Err(BackendError::Rejected {
            service: "GitHub",
            message: format!("unsupported content encoding '{}'", entry.encoding),
        });
    }
    // The API wraps base64 at 60 columns.
    let packed: String = entry.content.split_whitespace().collect();
    let bytes = STANDARD.decode(packed)?;
    Ok(ContentDocument::from_json(&bytes)?)
}

fn is_sha_conflict(status: StatusCode, body: &str) -> bool {
    status == StatusCode::CONFLICT
        || (status == StatusCode::UNPROCESSABLE_ENTITY && body.contains("does not match"))
}

#[async_trait]
impl ContentStore for GitHubStore {
    fn name(&self) -> &str {
        "github"
    }

    async fn read(&self) -> Result<Versioned> {
        let entry = self
            .fetch()
            .await?
            .ok_or_else(|| BackendError::NotFound(self.config.path.clone()))?;
        let document = decode_entry(&entry)?;
        Ok(Versioned {
            document,
            version: Some(VersionToken::new(entry.sha)),
        })
    }

    async fn version(&self) -> Result<Option<VersionToken>> {
        Ok(self.fetch().await?.map(|entry| VersionToken::new(entry.sha)))
    }

    async fn write(
        &self,
        document: &ContentDocument,
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<Option<VersionToken>> {
        let target = self.target()?;
        let body = PutContents {
            message,
            content: STANDARD.encode(encode_document(document)?),
            sha: expected.map(VersionToken::as_str),
            branch: &self.config.branch,
        };
        debug!(
            "github: PUT {url} sha={sha}",
            url: target.url.as_str(),
            sha: body.sha.unwrap_or("(new)")
        );

        let response = self
            .request(reqwest::Method::PUT, &target)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if is_sha_conflict(status, &text) {
                return Err(BackendError::VersionMismatch(text));
            }
            return Err(BackendError::Status {
                status: status.as_u16(),
                url: target.url,
                body: text,
            });
        }

        let put: PutResponse = http::json_body(response).await?;
        let version = put.content.map(|entry| VersionToken::new(entry.sha));
        info!(
            "github: committed {message} to {branch}",
            message: message,
            branch: self.config.branch.as_str()
        );
        Ok(version)
    }
}

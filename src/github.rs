use crate::config::GitHubConfig;
use crate::errors::StoreError;
use crate::models::RemoteFile;
use crate::storage::ContentStore;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "2022-11-28";
const ACCEPT: &str = "application/vnd.github+json";

/// Reads and commits one file through the GitHub Contents API.
#[derive(Debug, Clone)]
pub struct GitHubContents {
    config: GitHubConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    message: &'a str,
    content: String,
    sha: &'a str,
}

impl GitHubContents {
    pub fn new(config: GitHubConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder().user_agent("ww-site/0.1");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_url,
            self.config.owner,
            self.config.repo,
            self.config.path.trim_start_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.token)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(header::ACCEPT, ACCEPT)
    }
}

#[async_trait]
impl ContentStore for GitHubContents {
    fn path(&self) -> &str {
        &self.config.path
    }

    async fn read(&self) -> Result<RemoteFile, StoreError> {
        let response = self.authorized(self.http.get(self.url())).send().await?;
        let response = ensure_success(response).await?;
        let file: ContentsResponse = response.json().await?;
        debug!(sha = %file.sha, "fetched {}", self.config.path);

        Ok(RemoteFile {
            content: decode_content(&file.content)?,
            sha: file.sha,
        })
    }

    async fn write(&self, content: &str, sha: &str, message: &str) -> Result<(), StoreError> {
        let body = UpdateRequest {
            message,
            content: STANDARD.encode(content.as_bytes()),
            sha,
        };
        let response = self
            .authorized(self.http.put(self.url()))
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Status { status, body })
}

/// GitHub wraps the base64 payload at 60 columns.
pub fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|err| StoreError::Decode(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| StoreError::Decode(err.to_string()))
}

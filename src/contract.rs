//! # contract: interfaces between the pipeline and its external services
//!
//! This module defines one trait per collaborator — [`RepoHost`] for the
//! source-control hosting API and [`Completions`] for the chat-style
//! completion service — together with the plain data types and error kinds
//! that cross those seams.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so the orchestration in
//!   `pipeline` and the traversal helpers in `github` can be tested without
//!   touching the network.
//! - Mocks are also exported under the `test-export-mocks` feature for use
//!   from integration tests.

use std::fmt;

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;

/// Owner/repository pair identifying one hosted repository.
///
/// Derived once from the input URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Top-level repository attributes as returned by the hosting API.
///
/// Counters default to zero and everything else is optional so that a
/// minimal response still decodes. No field is validated.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub license: Option<License>,
    pub clone_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct License {
    pub name: Option<String>,
}

/// One file or directory record as seen by the content-listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
    /// Size in bytes; the hosting API reports it for files.
    pub size: Option<u64>,
    /// Raw-content URL; present for files the API can serve directly.
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// Errors from the hosting API.
///
/// A missing repository is a distinct kind from any other non-success
/// status so callers can suggest providing a credential.
#[derive(Debug)]
pub enum HostError {
    NotFound,
    Status(u16),
    Transport(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotFound => write!(
                f,
                "repository not found or access denied (private repositories need a GITHUB_TOKEN)"
            ),
            HostError::Status(code) => write!(f, "repository request failed with status {code}"),
            HostError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::Transport(err.to_string())
    }
}

/// Chat message roles understood by the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-style completion request: ordered messages plus sampling knobs.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Errors from the completion service boundary.
#[derive(Debug)]
pub enum CompletionError {
    Authentication(String),
    RateLimited(String),
    ServiceUnavailable(String),
    InvalidResponse(String),
    Network(String),
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Authentication(msg) => write!(f, "authentication failed: {msg}"),
            CompletionError::RateLimited(msg) => write!(f, "rate limited: {msg}"),
            CompletionError::ServiceUnavailable(msg) => write!(f, "service unavailable: {msg}"),
            CompletionError::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
            CompletionError::Network(msg) => write!(f, "network error: {msg}"),
        }
    }
}

impl std::error::Error for CompletionError {}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::Network(format!("request timed out: {err}"))
        } else if err.is_connect() {
            CompletionError::Network(format!("connection failed: {err}"))
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

/// Trait for reading repository data from a hosting service.
///
/// Implemented by the real API client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Fetch top-level repository metadata.
    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, HostError>;

    /// List the immediate entries at `path` (empty string for the root).
    async fn list_path(&self, repo: &RepoRef, path: &str) -> Result<Vec<TreeEntry>, HostError>;

    /// Download raw file content from a previously discovered URL.
    async fn fetch_raw(&self, url: &str) -> Result<String, HostError>;
}

/// Trait for the completion service: one request in, reply text out.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Completions: Send + Sync {
    /// Send one chat-style request and return the reply content verbatim.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;
}

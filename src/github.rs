//! GitHub REST client plus the repository traversal helpers built on it.

use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, error};
use url::Url;

use crate::contract::{EntryKind, HostError, RepoHost, RepoMetadata, RepoRef, TreeEntry};
use crate::summary::truncate_chars;

pub const API_BASE: &str = "https://api.github.com";

/// Directories whose path already contains this many `/` separators are
/// listed but not expanded further.
const MAX_TREE_DEPTH: usize = 2;

/// Filenames worth downloading in full (truncated) for analysis context.
pub const KEY_FILES: [&str; 8] = [
    "package.json",
    "requirements.txt",
    "setup.py",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "README.md",
    "LICENSE",
];

/// Cap on stored key-file content, in characters.
const KEY_FILE_CONTENT_CAP: usize = 2000;

/// Extract the owner/repository pair from a hosting-service URL.
///
/// Takes the first two path segments verbatim; anything shorter is
/// rejected. No character-set validation beyond URL syntax.
pub fn parse_repo_url(repo_url: &str) -> Result<RepoRef> {
    let parsed =
        Url::parse(repo_url).map_err(|e| anyhow!("invalid repository URL {repo_url:?}: {e}"))?;
    let path = parsed.path().trim_matches('/');
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some(owner), Some(repo)) => Ok(RepoRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
        }),
        _ => Err(anyhow!(
            "invalid repository URL {repo_url:?}: expected https://github.com/<owner>/<repo>"
        )),
    }
}

/// Client for the GitHub REST API. Holds the optional credential; all
/// requests go out with a User-Agent, which the API requires.
pub struct GitHubClient {
    http: Client,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        let http = Client::builder()
            .user_agent(concat!("readme-forge/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                error!(error = %e, "Failed to build HTTP client, using default client");
                Client::new()
            });
        Self { http, token }
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req
                .header("Authorization", format!("token {token}"))
                .header("Accept", "application/vnd.github.v3+json");
        }
        req
    }
}

#[async_trait]
impl RepoHost for GitHubClient {
    async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata, HostError> {
        let url = format!("{API_BASE}/repos/{}/{}", repo.owner, repo.repo);
        debug!(url = %url, "Fetching repository metadata");
        let response = self.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(HostError::NotFound),
            status if !status.is_success() => Err(HostError::Status(status.as_u16())),
            _ => Ok(response.json::<RepoMetadata>().await?),
        }
    }

    async fn list_path(&self, repo: &RepoRef, path: &str) -> Result<Vec<TreeEntry>, HostError> {
        let url = format!(
            "{API_BASE}/repos/{}/{}/contents/{}",
            repo.owner, repo.repo, path
        );
        debug!(url = %url, "Listing repository contents");
        let response = self.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        let items = response.json::<Vec<ContentItem>>().await?;
        Ok(items.into_iter().filter_map(ContentItem::into_entry).collect())
    }

    async fn fetch_raw(&self, url: &str) -> Result<String, HostError> {
        let response = self.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(HostError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Wire shape of one entry from the contents endpoint.
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
    download_url: Option<String>,
}

impl ContentItem {
    /// Symlinks and submodules are dropped; the pipeline only understands
    /// files and directories.
    fn into_entry(self) -> Option<TreeEntry> {
        let kind = match self.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => return None,
        };
        Some(TreeEntry {
            name: self.name,
            path: self.path,
            kind,
            size: self.size,
            download_url: self.download_url,
        })
    }
}

/// Depth-first listing of the whole repository, bounded by
/// [`MAX_TREE_DEPTH`].
///
/// A failed listing anywhere in the tree degrades to an empty listing for
/// that path; partial trees are accepted silently rather than signalled.
pub async fn walk_tree(host: &dyn RepoHost, repo: &RepoRef) -> Vec<TreeEntry> {
    walk_path(host, repo, String::new()).await
}

fn walk_path<'a>(
    host: &'a dyn RepoHost,
    repo: &'a RepoRef,
    path: String,
) -> BoxFuture<'a, Vec<TreeEntry>> {
    Box::pin(async move {
        let entries = match host.list_path(repo, &path).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(path = %path, error = %e, "Listing failed, treating as empty");
                return Vec::new();
            }
        };

        let mut collected = Vec::with_capacity(entries.len());
        for entry in entries {
            let expand = entry.kind == EntryKind::Dir && depth_of(&entry.path) < MAX_TREE_DEPTH;
            let child_path = entry.path.clone();
            collected.push(entry);
            if expand {
                collected.extend(walk_path(host, repo, child_path).await);
            }
        }
        collected
    })
}

fn depth_of(path: &str) -> usize {
    path.matches('/').count()
}

/// Download the allow-listed manifest/documentation files named in
/// `entries`, truncated to [`KEY_FILE_CONTENT_CAP`] characters each.
///
/// Per-file failures are logged and skipped; collection always completes.
pub async fn collect_key_files(
    host: &dyn RepoHost,
    entries: &[TreeEntry],
) -> BTreeMap<String, String> {
    let mut contents = BTreeMap::new();
    for entry in entries {
        if entry.kind != EntryKind::File || !KEY_FILES.contains(&entry.name.as_str()) {
            continue;
        }
        let Some(url) = &entry.download_url else {
            continue;
        };
        match host.fetch_raw(url).await {
            Ok(text) => {
                let text = truncate_chars(&text, KEY_FILE_CONTENT_CAP);
                debug!(file = %entry.name, "Fetched key file");
                contents.insert(entry.name.clone(), text);
            }
            Err(e) => {
                error!(file = %entry.name, error = %e, "Error reading key file, skipping");
            }
        }
    }
    contents
}

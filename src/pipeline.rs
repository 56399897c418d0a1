//! Coordinating module for the fetch-analyse-generate pipeline.
//!
//! Strictly linear: each step's output feeds the next, nothing runs
//! concurrently, and nothing is retained across invocations.

use anyhow::Result;
use tracing::info;

use crate::analyse::analyse_repository;
use crate::contract::{Completions, RepoHost};
use crate::generate::generate_document;
use crate::github::{collect_key_files, parse_repo_url, walk_tree};

/// Prefix of the fallback document produced when the pipeline fails.
/// Callers detect failure by content inspection, not by error values.
pub const ERROR_PREFIX: &str = "Error generating README:";

/// Run the whole pipeline for one repository URL.
///
/// Always returns a document string; a failure anywhere is folded into a
/// body starting with [`ERROR_PREFIX`].
pub async fn generate_readme(
    host: &dyn RepoHost,
    completions: &dyn Completions,
    repo_url: &str,
) -> String {
    match run(host, completions, repo_url).await {
        Ok(document) => document,
        Err(e) => format!("{ERROR_PREFIX} {e}"),
    }
}

async fn run(
    host: &dyn RepoHost,
    completions: &dyn Completions,
    repo_url: &str,
) -> Result<String> {
    let repo = parse_repo_url(repo_url)?;
    info!(repo = %repo, "🔍 Analyzing repository");

    let metadata = host.repo_metadata(&repo).await?;
    info!("📚 Repository data fetched");

    let entries = walk_tree(host, &repo).await;
    info!(count = entries.len(), "📂 Collected files and folders");

    let key_files = collect_key_files(host, &entries).await;
    info!(count = key_files.len(), "📄 Fetched key files");

    info!("🤖 Analyzing repository with AI...");
    let analysis = analyse_repository(completions, &metadata, &entries, &key_files).await;

    info!("✍️ Generating README with AI...");
    Ok(generate_document(completions, &metadata, &entries, &analysis).await)
}

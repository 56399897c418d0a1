pub mod analyse;
pub mod completion;
pub mod config;
pub mod contract;
pub mod generate;
pub mod github;
pub mod pipeline;
pub mod summary;

use std::io::Write as _;

use anyhow::{Context, Result};
use clap::Parser;

use completion::CompletionClient;
use config::Config;
use github::GitHubClient;

/// Interactive runs persist the generated document here.
pub const OUTPUT_FILE: &str = "ai_generated_README.md";

/// CLI for readme-forge: generate a README for a hosted repository.
#[derive(Parser)]
#[clap(
    name = "readme-forge",
    version,
    about = "Generate a polished README for a GitHub repository with an LLM analysis pipeline"
)]
pub struct Cli {
    /// Repository URL (e.g. https://github.com/owner/repo); prompts
    /// interactively when omitted
    pub repo_url: Option<String>,
}

/// Extracted async CLI logic entrypoint for integration tests and main().
/// Returns the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    let config = Config::from_env()?;
    config.trace_loaded();

    let host = GitHubClient::new(config.github_token.clone());
    let completions = CompletionClient::new(&config);

    match cli.repo_url {
        Some(repo_url) => {
            let readme = pipeline::generate_readme(&host, &completions, &repo_url).await;
            println!("{readme}");
            Ok(if readme.starts_with(pipeline::ERROR_PREFIX) {
                1
            } else {
                0
            })
        }
        None => {
            println!("AI-Powered GitHub README Generator");
            println!("{}", "=".repeat(50));

            print!("\nEnter GitHub repository URL: ");
            std::io::stdout().flush().context("failed to flush stdout")?;
            let mut repo_url = String::new();
            std::io::stdin()
                .read_line(&mut repo_url)
                .context("failed to read repository URL")?;
            let repo_url = repo_url.trim();
            if repo_url.is_empty() {
                println!("Repository URL is required!");
                return Ok(1);
            }

            println!("\nGenerating README...");
            let readme = pipeline::generate_readme(&host, &completions, repo_url).await;

            std::fs::write(OUTPUT_FILE, &readme)
                .with_context(|| format!("failed to write {OUTPUT_FILE}"))?;
            println!("\nREADME generated successfully! Saved to: {OUTPUT_FILE}");
            Ok(0)
        }
    }
}

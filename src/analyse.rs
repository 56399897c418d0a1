//! First completion call: structured analysis of the repository.
//!
//! The completion service replies with free text that should contain a JSON
//! object; extraction and decoding live behind [`parse_analysis`] so the
//! fragile contract sits in one tested place. Nothing here ever fails past
//! its own boundary.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::contract::{ChatMessage, CompletionRequest, Completions, RepoMetadata, TreeEntry};
use crate::summary::{format_key_files, summarise_structure, DEFAULT_MAX_FILES};

const ANALYSIS_TEMPERATURE: f32 = 0.3;

const ANALYST_PERSONA: &str = "You are a senior software engineer analyzing GitHub repositories. \
    Provide accurate, concise analysis in valid JSON format.";

/// Structured analysis of a repository, as requested from the completion
/// service.
///
/// Fields missing from the reply fall back to the same placeholders as a
/// wholly failed analysis, so all seven are always populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoAnalysis {
    pub project_type: String,
    pub main_purpose: String,
    pub technologies: Vec<String>,
    pub key_features: Vec<String>,
    pub target_audience: String,
    pub complexity_level: String,
    pub installation_type: String,
}

impl Default for RepoAnalysis {
    fn default() -> Self {
        Self {
            project_type: "Unknown".to_string(),
            main_purpose: "Purpose not determined".to_string(),
            technologies: Vec::new(),
            key_features: Vec::new(),
            target_audience: "Developers".to_string(),
            complexity_level: "intermediate".to_string(),
            installation_type: "manual".to_string(),
        }
    }
}

/// Ask the completion service for a structured analysis.
///
/// Never fails: any request or parse problem is logged and replaced by
/// [`RepoAnalysis::default`].
pub async fn analyse_repository(
    completions: &dyn Completions,
    metadata: &RepoMetadata,
    entries: &[TreeEntry],
    key_files: &BTreeMap<String, String>,
) -> RepoAnalysis {
    let prompt = build_analysis_prompt(metadata, entries, key_files);
    let request = CompletionRequest {
        messages: vec![ChatMessage::system(ANALYST_PERSONA), ChatMessage::user(prompt)],
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: None,
    };

    let reply = match completions.complete(request).await {
        Ok(reply) => reply,
        Err(e) => {
            error!(error = %e, "Analysis request failed, using default analysis");
            return RepoAnalysis::default();
        }
    };

    match parse_analysis(&reply) {
        Some(analysis) => {
            info!(project_type = %analysis.project_type, "Repository analysis parsed");
            analysis
        }
        None => {
            error!("Analysis reply carried no decodable JSON object, using default analysis");
            RepoAnalysis::default()
        }
    }
}

fn build_analysis_prompt(
    metadata: &RepoMetadata,
    entries: &[TreeEntry],
    key_files: &BTreeMap<String, String>,
) -> String {
    format!(
        "Analyze this GitHub repository and provide a structured analysis:\n\
         \n\
         Repository Name: {name}\n\
         Description: {description}\n\
         Language: {language}\n\
         Stars: {stars}\n\
         Forks: {forks}\n\
         \n\
         File Structure:\n\
         {structure}\n\
         \n\
         Key File Contents:\n\
         {contents}\n\
         \n\
         Please provide a JSON response with the following structure:\n\
         {{\n\
             \"project_type\": \"Brief description of what type of project this is\",\n\
             \"main_purpose\": \"What does this project do?\",\n\
             \"technologies\": [\"list\", \"of\", \"technologies\", \"used\"],\n\
             \"key_features\": [\"list\", \"of\", \"main\", \"features\"],\n\
             \"target_audience\": \"Who would use this project?\",\n\
             \"complexity_level\": \"beginner/intermediate/advanced\",\n\
             \"installation_type\": \"pip/npm/docker/manual/etc\"\n\
         }}",
        name = metadata.name,
        description = metadata
            .description
            .as_deref()
            .unwrap_or("No description provided"),
        language = metadata.language.as_deref().unwrap_or("Not specified"),
        stars = metadata.stargazers_count,
        forks = metadata.forks_count,
        structure = summarise_structure(entries, DEFAULT_MAX_FILES),
        contents = format_key_files(key_files),
    )
}

/// Decode the substring between the first `{` and the last `}` of a reply
/// as an analysis record.
pub(crate) fn parse_analysis(reply: &str) -> Option<RepoAnalysis> {
    let json = extract_json(reply)?;
    serde_json::from_str(json).ok()
}

/// Locate the outermost brace pair in free text.
fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

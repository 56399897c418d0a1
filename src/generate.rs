//! Second completion call: the README document itself.

use tracing::error;

use crate::analyse::RepoAnalysis;
use crate::contract::{ChatMessage, CompletionRequest, Completions, RepoMetadata, TreeEntry};
use crate::summary::{summarise_structure, DEFAULT_MAX_FILES};

const README_TEMPERATURE: f32 = 0.4;
const README_MAX_TOKENS: u32 = 3000;

const WRITER_PERSONA: &str = "You are a technical writer specializing in creating excellent \
    README files for GitHub repositories. Create comprehensive, well-structured, and engaging \
    documentation.";

/// Request the final document from the completion service.
///
/// On failure the error message becomes the document body; callers can
/// only tell success from failure by inspecting the content.
pub async fn generate_document(
    completions: &dyn Completions,
    metadata: &RepoMetadata,
    entries: &[TreeEntry],
    analysis: &RepoAnalysis,
) -> String {
    let prompt = build_readme_prompt(metadata, entries, analysis);
    let request = CompletionRequest {
        messages: vec![ChatMessage::system(WRITER_PERSONA), ChatMessage::user(prompt)],
        temperature: README_TEMPERATURE,
        max_tokens: Some(README_MAX_TOKENS),
    };

    match completions.complete(request).await {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "README generation request failed");
            format!("Error generating README with LLM: {e}")
        }
    }
}

fn build_readme_prompt(
    metadata: &RepoMetadata,
    entries: &[TreeEntry],
    analysis: &RepoAnalysis,
) -> String {
    let license = metadata
        .license
        .as_ref()
        .and_then(|l| l.name.as_deref())
        .unwrap_or("Not specified");

    format!(
        "Create a comprehensive, professional README.md file for this GitHub repository:\n\
         \n\
         Repository Information:\n\
         - Name: {name}\n\
         - Description: {description}\n\
         - Language: {language}\n\
         - Stars: {stars}\n\
         - Forks: {forks}\n\
         - License: {license}\n\
         - Clone URL: {clone_url}\n\
         \n\
         Project Analysis:\n\
         - Type: {project_type}\n\
         - Purpose: {main_purpose}\n\
         - Technologies: {technologies}\n\
         - Key Features: {key_features}\n\
         - Target Audience: {target_audience}\n\
         - Complexity: {complexity_level}\n\
         - Installation Type: {installation_type}\n\
         \n\
         File Structure:\n\
         {structure}\n\
         \n\
         Please create a README.md that includes:\n\
         1. An engaging title and description\n\
         2. Badges (stars, forks, license, language)\n\
         3. Table of contents\n\
         4. Clear installation instructions based on the project type\n\
         5. Usage examples\n\
         6. Project structure overview\n\
         7. Features list\n\
         8. Contributing guidelines\n\
         9. License information\n\
         10. Repository statistics\n\
         \n\
         Make it professional, engaging, and easy to understand. Use proper markdown formatting.\n\
         Include relevant emojis to make it visually appealing.\n\
         Tailor the content specifically to this project's purpose and audience.",
        name = metadata.name,
        description = metadata
            .description
            .as_deref()
            .unwrap_or("No description provided"),
        language = metadata.language.as_deref().unwrap_or("Not specified"),
        stars = metadata.stargazers_count,
        forks = metadata.forks_count,
        clone_url = metadata.clone_url,
        project_type = analysis.project_type,
        main_purpose = analysis.main_purpose,
        technologies = analysis.technologies.join(", "),
        key_features = analysis.key_features.join(", "),
        target_audience = analysis.target_audience,
        complexity_level = analysis.complexity_level,
        installation_type = analysis.installation_type,
        structure = summarise_structure(entries, DEFAULT_MAX_FILES),
    )
}

//! End-to-end pipeline tests against mocked external services.

use readme_forge::contract::{
    CompletionError, EntryKind, HostError, MockCompletions, MockRepoHost, RepoMetadata, TreeEntry,
};
use readme_forge::pipeline::{generate_readme, ERROR_PREFIX};

fn minimal_metadata() -> RepoMetadata {
    serde_json::from_str(r#"{"name":"widget","clone_url":"https://github.com/acme/widget.git"}"#)
        .expect("minimal metadata decodes")
}

/// Answers the analysis request with a JSON blob and the README request
/// with a fixed document, in either order.
fn scripted_completions(readme: &'static str) -> MockCompletions {
    let mut completions = MockCompletions::new();
    completions.expect_complete().times(2).returning(move |req| {
        let user = &req.messages[1].content;
        if user.contains("Please provide a JSON response") {
            Ok(r#"{"project_type":"CLI tool","main_purpose":"generates docs",
                   "technologies":["Rust"],"key_features":["fast"],
                   "target_audience":"maintainers","complexity_level":"beginner",
                   "installation_type":"cargo"}"#
                .to_string())
        } else {
            Ok(readme.to_string())
        }
    });
    completions
}

#[tokio::test]
async fn empty_repository_still_produces_a_document() {
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Ok(minimal_metadata()));
    host.expect_list_path()
        .withf(|_, path| path.is_empty())
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let completions = scripted_completions("# widget\n\nGenerated.");
    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert_eq!(readme, "# widget\n\nGenerated.");
}

#[tokio::test]
async fn empty_tree_renders_an_empty_structure_section() {
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Ok(minimal_metadata()));
    host.expect_list_path()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let mut completions = MockCompletions::new();
    completions.expect_complete().times(2).returning(|req| {
        let user = &req.messages[1].content;
        assert!(user.contains("File Structure:\n\n"));
        if user.contains("Please provide a JSON response") {
            Ok("{}".to_string())
        } else {
            Ok("generated".to_string())
        }
    });

    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert_eq!(readme, "generated");
}

#[tokio::test]
async fn malformed_url_is_folded_into_the_error_document() {
    let host = MockRepoHost::new();
    let completions = MockCompletions::new();

    let readme =
        generate_readme(&host, &completions, "https://github.com/just-an-owner").await;
    assert!(readme.starts_with(ERROR_PREFIX));
    assert!(readme.contains("invalid repository URL"));
}

#[tokio::test]
async fn missing_repository_reports_the_not_found_kind() {
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Err(HostError::NotFound));
    let completions = MockCompletions::new();

    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert!(readme.starts_with(ERROR_PREFIX));
    assert!(readme.contains("not found or access denied"));
}

#[tokio::test]
async fn other_status_errors_carry_the_code() {
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Err(HostError::Status(503)));
    let completions = MockCompletions::new();

    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert!(readme.starts_with(ERROR_PREFIX));
    assert!(readme.contains("503"));
}

#[tokio::test]
async fn failed_analysis_still_generates_with_the_default_record() {
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Ok(minimal_metadata()));
    host.expect_list_path()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let mut completions = MockCompletions::new();
    completions.expect_complete().times(2).returning(|req| {
        let user = &req.messages[1].content;
        if user.contains("Please provide a JSON response") {
            Err(CompletionError::ServiceUnavailable("down".to_string()))
        } else {
            // The default analysis flows into the second prompt.
            assert!(user.contains("- Type: Unknown"));
            assert!(user.contains("- Purpose: Purpose not determined"));
            Ok("generated anyway".to_string())
        }
    });

    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert_eq!(readme, "generated anyway");
}

#[tokio::test]
async fn key_files_feed_the_analysis_prompt() {
    let cargo_toml = TreeEntry {
        name: "Cargo.toml".to_string(),
        path: "Cargo.toml".to_string(),
        kind: EntryKind::File,
        size: Some(120),
        download_url: Some("https://raw.invalid/Cargo.toml".to_string()),
    };
    let mut host = MockRepoHost::new();
    host.expect_repo_metadata()
        .times(1)
        .returning(|_| Ok(minimal_metadata()));
    host.expect_list_path()
        .times(1)
        .returning(move |_, _| Ok(vec![cargo_toml.clone()]));
    host.expect_fetch_raw()
        .times(1)
        .returning(|_| Ok("[package]\nname = \"widget\"".to_string()));

    let mut completions = MockCompletions::new();
    completions.expect_complete().times(2).returning(|req| {
        let user = &req.messages[1].content;
        if user.contains("Please provide a JSON response") {
            assert!(user.contains("--- Cargo.toml ---"));
            assert!(user.contains("name = \"widget\""));
            Ok("{}".to_string())
        } else {
            Ok("done".to_string())
        }
    });

    let readme =
        generate_readme(&host, &completions, "https://github.com/acme/widget").await;
    assert_eq!(readme, "done");
}

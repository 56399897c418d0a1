//! Rendering of the collected tree and key files into bounded text blocks
//! for prompt embedding.

use std::collections::{BTreeMap, BTreeSet};

use crate::contract::{EntryKind, TreeEntry};

/// Directories shown in a structure summary, at most.
const MAX_SUMMARY_DIRS: usize = 10;

/// Files shown in a structure summary by default.
pub const DEFAULT_MAX_FILES: usize = 30;

/// Key-file content is re-truncated to this many characters when rendered
/// into a prompt.
const RENDERED_CONTENT_CAP: usize = 500;

/// Render the tree listing as one line per entry, directories first.
///
/// Deterministic for a given entry sequence: paths are deduplicated and
/// sorted, with at most [`MAX_SUMMARY_DIRS`] directories and `max_files`
/// files shown, and a trailing count of any files omitted.
pub fn summarise_structure(entries: &[TreeEntry], max_files: usize) -> String {
    let mut dirs = BTreeSet::new();
    let mut files = Vec::new();
    for entry in entries {
        match entry.kind {
            EntryKind::Dir => {
                dirs.insert(entry.path.as_str());
            }
            EntryKind::File => files.push(entry.path.as_str()),
        }
    }
    files.sort_unstable();

    let mut lines: Vec<String> = Vec::new();
    for dir in dirs.iter().take(MAX_SUMMARY_DIRS) {
        lines.push(format!("📁 {dir}/"));
    }
    for file in files.iter().take(max_files) {
        lines.push(format!("📄 {file}"));
    }
    if files.len() > max_files {
        lines.push(format!("... and {} more files", files.len() - max_files));
    }

    lines.join("\n")
}

/// Render key-file contents for prompt embedding, one `--- name ---` block
/// per file, each capped at [`RENDERED_CONTENT_CAP`] characters with an
/// ellipsis marker when longer.
pub fn format_key_files(contents: &BTreeMap<String, String>) -> String {
    let mut formatted = Vec::new();
    for (filename, content) in contents {
        formatted.push(format!("\n--- {filename} ---"));
        if content.chars().count() > RENDERED_CONTENT_CAP {
            formatted.push(format!("{}...", truncate_chars(content, RENDERED_CONTENT_CAP)));
        } else {
            formatted.push(content.clone());
        }
    }
    formatted.join("\n")
}

/// Truncate to the first `max` characters, never splitting a code point.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

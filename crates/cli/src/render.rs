use crate::ingest::FileEntry;
use anyhow::{Context, Result};

/// Prefix each line with a right-aligned line number
pub fn add_line_numbers(code: &str) -> String {
    code.split('\n')
        .enumerate()
        .map(|(idx, line)| format!("{:4} | {line}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap code in a fenced block tagged with the file extension
pub fn wrap_code_block(code: &str, extension: &str) -> String {
    let info = extension.trim_start_matches('.');
    format!("```{info}\n{code}\n```")
}

pub fn render_markdown(entries: &[FileEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("`{}`:\n\n{}", entry.path, entry.code.trim_end_matches('\n')))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_json(entries: &[FileEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).context("Failed to serialize file entries")
}

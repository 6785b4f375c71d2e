use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Expand input paths into a sorted, deduplicated list of files.
///
/// Files given explicitly are always included. Directories are walked with
/// gitignore rules applied and hidden entries skipped.
pub fn collect_files(inputs: &[PathBuf], follow_symlinks: bool) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        let meta = std::fs::metadata(input)
            .with_context(|| format!("Cannot access {}", input.display()))?;
        if meta.is_file() {
            files.push(input.clone());
            continue;
        }
        walk_directory(input, follow_symlinks, &mut files);
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_directory(root: &Path, follow_symlinks: bool, files: &mut Vec<PathBuf>) {
    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(follow_symlinks);

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let Some(file_type) = entry.file_type() else {
                    continue;
                };
                if !file_type.is_file() {
                    continue;
                }

                if let Ok(meta) = entry.metadata() {
                    if meta.len() > MAX_FILE_SIZE_BYTES {
                        log::debug!(
                            "Skipping large file {} ({} bytes > {})",
                            entry.path().display(),
                            meta.len(),
                            MAX_FILE_SIZE_BYTES
                        );
                        continue;
                    }
                }

                files.push(entry.into_path());
            }
            Err(err) => {
                log::warn!("Error walking {}: {err}", root.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn walks_sorted_and_respects_gitignore() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/b.go"), "package b").unwrap();
        fs::write(root.join("src/a.py"), "import os").unwrap();
        fs::write(root.join("src/nested/c.js"), "let x;").unwrap();
        fs::write(root.join("skip.log"), "noise").unwrap();
        fs::write(root.join(".hidden.sh"), "echo").unwrap();
        fs::write(root.join(".gitignore"), "*.log\n").unwrap();

        let files = collect_files(&[root.to_path_buf()], false).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(rel, vec!["src/a.py", "src/b.go", "src/nested/c.js"]);
    }

    #[test]
    fn explicit_files_and_duplicates() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("main.go");
        fs::write(&file, "package main").unwrap();

        let files = collect_files(&[file.clone(), temp.path().to_path_buf()], false).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_input_is_an_error() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("does-not-exist");
        assert!(collect_files(&[missing], false).is_err());
    }
}

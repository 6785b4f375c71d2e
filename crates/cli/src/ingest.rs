use crate::render::{add_line_numbers, wrap_code_block};
use anyhow::{Context, Result};
use context_code_compressor::{CompressionStats, Compressor, Language};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Semaphore;

/// One file of the packed output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    /// Extension including the leading dot, empty when the file has none
    pub extension: String,
    pub code: String,
    pub compressed: bool,
    /// Why compression was skipped or failed
    pub note: Option<String>,
}

/// Ingested file together with its compression measurement
#[derive(Debug, Clone)]
pub struct Ingested {
    pub entry: FileEntry,
    pub stats: Option<CompressionStats>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub line_numbers: bool,
    pub code_block: bool,
}

/// Compression backend used during ingestion
pub trait LanguageCompressor: Send + Sync {
    fn compress_language(
        &self,
        content: &[u8],
        language: Language,
    ) -> context_code_compressor::Result<String>;
}

impl LanguageCompressor for Compressor {
    fn compress_language(
        &self,
        content: &[u8],
        language: Language,
    ) -> context_code_compressor::Result<String> {
        Compressor::compress_language(self, content, language)
    }
}

enum Attempt {
    Compressed(String),
    Raw(Option<String>),
}

/// Reads files and turns them into output entries.
///
/// Compression is optional and never fatal: any failure keeps the original
/// content. A language whose query fails to compile is disabled for the rest
/// of the run after one warning.
pub struct FileIngestor<C = Compressor> {
    compressor: Option<C>,
    format: FormatOptions,
    disabled: Mutex<HashSet<Language>>,
}

impl<C: LanguageCompressor> FileIngestor<C> {
    pub fn new(compressor: Option<C>, format: FormatOptions) -> Self {
        Self {
            compressor,
            format,
            disabled: Mutex::new(HashSet::new()),
        }
    }

    /// Ingest one file. `Ok(None)` means the file was skipped (not UTF-8).
    pub fn ingest(&self, path: &Path) -> Result<Option<Ingested>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let Ok(text) = String::from_utf8(bytes) else {
            log::debug!("Skipping non-UTF-8 file {}", path.display());
            return Ok(None);
        };

        let display = path.display().to_string();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let note = match &self.compressor {
            Some(compressor) => match self.try_compress(compressor, path, text.as_bytes()) {
                Attempt::Compressed(code) => {
                    let stats = CompressionStats::measure(text.as_bytes(), &code);
                    return Ok(Some(Ingested {
                        entry: FileEntry {
                            path: display,
                            extension,
                            code,
                            compressed: true,
                            note: None,
                        },
                        stats: Some(stats),
                    }));
                }
                Attempt::Raw(note) => note,
            },
            None => None,
        };

        let mut code = text;
        if self.format.line_numbers {
            code = add_line_numbers(&code);
        }
        if self.format.code_block {
            code = wrap_code_block(&code, &extension);
        }

        Ok(Some(Ingested {
            entry: FileEntry {
                path: display,
                extension,
                code,
                compressed: false,
                note,
            },
            stats: None,
        }))
    }

    /// Ingest files in parallel, at most `jobs` at a time. Output keeps input order.
    pub async fn ingest_all(
        self: Arc<Self>,
        files: Vec<PathBuf>,
        jobs: usize,
    ) -> Result<Vec<Ingested>>
    where
        C: 'static,
    {
        let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
        let mut handles = Vec::with_capacity(files.len());

        for path in files {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .context("Ingestion limiter closed")?;
            let ingestor = Arc::clone(&self);
            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let result = ingestor.ingest(&path);
                (path, result)
            }));
        }

        let mut ingested = Vec::with_capacity(handles.len());
        for handle in handles {
            let (path, result) = handle.await.context("Ingestion task failed")?;
            match result {
                Ok(Some(item)) => ingested.push(item),
                Ok(None) => {}
                Err(err) => log::warn!("Skipping {}: {err:#}", path.display()),
            }
        }
        Ok(ingested)
    }

    fn try_compress(&self, compressor: &C, path: &Path, content: &[u8]) -> Attempt {
        let Ok(language) = Language::from_path(path) else {
            log::info!(
                "Language not identified for {}; using original content",
                path.display()
            );
            return Attempt::Raw(None);
        };

        if self.disabled().contains(&language) {
            return Attempt::Raw(Some(format!("compression disabled for {language}")));
        }

        match compressor.compress_language(content, language) {
            Ok(code) => Attempt::Compressed(code),
            Err(err) => {
                if err.is_language_wide() {
                    if self.disabled().insert(language) {
                        log::warn!("Disabling compression for {language}: {err}");
                    }
                } else {
                    log::warn!(
                        "Compression failed for {}: {err}. Using original content.",
                        path.display()
                    );
                }
                Attempt::Raw(Some(format!("compression failed: {err}")))
            }
        }
    }

    fn disabled(&self) -> MutexGuard<'_, HashSet<Language>> {
        self.disabled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_code_compressor::{CompressorConfig, CompressorError};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn formatted() -> FormatOptions {
        FormatOptions {
            line_numbers: false,
            code_block: true,
        }
    }

    #[test]
    fn compressed_entry_skips_formatting() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("main.go");
        fs::write(&path, "package main\nfunc main() { run() }\n").unwrap();

        let ingestor = FileIngestor::new(Some(Compressor::default()), formatted());
        let item = ingestor.ingest(&path).unwrap().unwrap();

        assert!(item.entry.compressed);
        assert_eq!(
            item.entry.code,
            "package main\n// -----\nfunc main() { ... } // Body removed\n"
        );
        assert_eq!(item.entry.extension, ".go");
        assert!(item.stats.is_some());
    }

    #[test]
    fn unknown_language_is_formatted_raw() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let ingestor = FileIngestor::new(
            Some(Compressor::default()),
            FormatOptions {
                line_numbers: true,
                code_block: true,
            },
        );
        let item = ingestor.ingest(&path).unwrap().unwrap();

        assert!(!item.entry.compressed);
        assert_eq!(item.entry.code, "```txt\n   1 | hello\n```");
        assert_eq!(item.entry.note, None);
    }

    #[test]
    fn failed_compression_keeps_original_with_note() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("app.js");
        fs::write(&path, "let x = 1;").unwrap();

        let compressor = Compressor::new(CompressorConfig {
            supported_languages: vec!["go".to_string()],
            ..Default::default()
        })
        .unwrap();
        let ingestor = FileIngestor::new(Some(compressor), FormatOptions::default());
        let item = ingestor.ingest(&path).unwrap().unwrap();

        assert!(!item.entry.compressed);
        assert_eq!(item.entry.code, "let x = 1;");
        assert!(item
            .entry
            .note
            .as_deref()
            .is_some_and(|note| note.contains("Unsupported language")));
    }

    /// Backend whose query never compiles
    #[derive(Default)]
    struct BrokenQuery {
        calls: AtomicUsize,
    }

    impl LanguageCompressor for BrokenQuery {
        fn compress_language(
            &self,
            _content: &[u8],
            language: Language,
        ) -> context_code_compressor::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(CompressorError::query_compile(
                language.as_str(),
                "Invalid node type",
            ))
        }
    }

    #[test]
    fn query_compile_error_disables_language() {
        let temp = tempdir().unwrap();
        let first = temp.path().join("a.go");
        let second = temp.path().join("b.go");
        let script = temp.path().join("c.py");
        fs::write(&first, "package a
").unwrap();
        fs::write(&second, "package b
").unwrap();
        fs::write(&script, "x = 1
").unwrap();

        let ingestor = FileIngestor::new(Some(BrokenQuery::default()), FormatOptions::default());

        let a = ingestor.ingest(&first).unwrap().unwrap().entry;
        assert!(!a.compressed);
        assert_eq!(a.code, "package a\n");
        assert_eq!(
            a.note.as_deref(),
            Some("compression failed: Query compile error for go: Invalid node type")
        );

        let b = ingestor.ingest(&second).unwrap().unwrap().entry;
        assert!(!b.compressed);
        assert_eq!(b.code, "package b\n");
        assert_eq!(b.note.as_deref(), Some("compression disabled for go"));

        // Other languages are still attempted
        let c = ingestor.ingest(&script).unwrap().unwrap().entry;
        assert!(c
            .note
            .as_deref()
            .is_some_and(|note| note.starts_with("compression failed:")));

        let compressor = ingestor.compressor.as_ref().unwrap();
        assert_eq!(compressor.calls.load(Ordering::SeqCst), 2);
        assert!(ingestor.disabled().contains(&Language::Go));
    }

    #[test]
    fn non_utf8_files_are_skipped() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("blob.c");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        let ingestor = FileIngestor::new(Some(Compressor::default()), formatted());
        assert!(ingestor.ingest(&path).unwrap().is_none());
    }

    #[tokio::test]
    async fn ingest_all_keeps_order() {
        let temp = tempdir().unwrap();
        let mut files = Vec::new();
        for idx in 0..12 {
            let path = temp.path().join(format!("f{idx:02}.py"));
            fs::write(&path, format!("def f{idx}():\n    return {idx}\n")).unwrap();
            files.push(path);
        }

        let ingestor = Arc::new(FileIngestor::new(Some(Compressor::default()), formatted()));
        let ingested = ingestor.ingest_all(files.clone(), 3).await.unwrap();

        let paths: Vec<String> = ingested.iter().map(|i| i.entry.path.clone()).collect();
        let expected: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
        assert_eq!(paths, expected);
        assert_eq!(
            ingested[4].entry.code,
            "def f4(): { ... } # Body removed\n"
        );
    }
}

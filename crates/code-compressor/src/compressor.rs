use crate::config::CompressorConfig;
use crate::error::{CompressorError, Result};
use crate::language::Language;
use crate::strategy::{CompressionStrategy, PatternStrategy, SyntaxStrategy};
use crate::types::{CompressionStats, SourceUnit};
use std::path::Path;

/// Main compressor entry point.
///
/// Picks the grammar strategy when the language has one and the pattern
/// strategy otherwise. Holds no per-call state, so one instance can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct Compressor {
    config: CompressorConfig,
    syntax: SyntaxStrategy,
    pattern: PatternStrategy,
}

impl Compressor {
    /// Create a compressor with a validated configuration
    pub fn new(config: CompressorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            syntax: SyntaxStrategy::new(config.collapse_nested),
            pattern: PatternStrategy::new(config.collapse_nested),
            config,
        })
    }

    /// Get compressor configuration
    pub const fn config(&self) -> &CompressorConfig {
        &self.config
    }

    /// Compress source content.
    ///
    /// `language` is a language identifier (`"go"`) or a file extension
    /// (`".go"`, `"py"`).
    pub fn compress(&self, content: &[u8], language: &str) -> Result<String> {
        let resolved = Language::from_identifier(language)
            .or_else(|_| Language::from_extension(language))?;
        self.compress_language(content, resolved)
    }

    /// Compress source content of an already resolved language
    pub fn compress_language(&self, content: &[u8], language: Language) -> Result<String> {
        if !self.config.allows(language) {
            return Err(CompressorError::unsupported_language(language.as_str()));
        }

        let unit = SourceUnit::new(content, language);
        let output = self.strategy_for(language).compress(unit)?;

        let stats = CompressionStats::measure(content, &output);
        log::debug!(
            "Compressed {language}: {} -> {} bytes ({:.1}%)",
            stats.original_bytes,
            stats.compressed_bytes,
            stats.ratio() * 100.0
        );
        Ok(output)
    }

    /// Read a file and compress it, resolving the language from its extension
    pub fn compress_file(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let language = Language::from_path(path)?;
        let content = std::fs::read(path)?;
        self.compress_language(&content, language)
    }

    fn strategy_for(&self, language: Language) -> &dyn CompressionStrategy {
        if language.has_grammar() {
            &self.syntax
        } else {
            &self.pattern
        }
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self {
            config: CompressorConfig::default(),
            syntax: SyntaxStrategy::new(true),
            pattern: PatternStrategy::new(true),
        }
    }
}

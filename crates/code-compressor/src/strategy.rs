use crate::assembler::ChunkAssembler;
use crate::classifier::CaptureClassifier;
use crate::error::{CompressorError, Result};
use crate::fallback::PatternRules;
use crate::parser::parse_source;
use crate::queries::QueryDefinition;
use crate::query::CompiledQuery;
use crate::types::{CodeChunk, SourceUnit};

/// One way of turning a source unit into compressed text
pub trait CompressionStrategy: Send + Sync {
    /// Produce the retained chunks for a unit, before assembly
    fn chunks(&self, unit: SourceUnit<'_>) -> Result<Vec<CodeChunk>>;

    /// Assembler applied to the chunks
    fn assembler(&self) -> ChunkAssembler;

    /// Compress a unit into its final text
    fn compress(&self, unit: SourceUnit<'_>) -> Result<String> {
        let chunks = self.chunks(unit)?;
        Ok(self.assembler().assemble(chunks))
    }
}

/// Grammar driven strategy: parse, query, classify, assemble.
///
/// Nothing is cached between calls. Each call owns its parser, tree, query
/// and cursor, which keeps the strategy `Send + Sync` without locks.
#[derive(Debug, Clone, Copy)]
pub struct SyntaxStrategy {
    assembler: ChunkAssembler,
}

impl SyntaxStrategy {
    pub const fn new(collapse_nested: bool) -> Self {
        Self {
            assembler: ChunkAssembler::new(collapse_nested),
        }
    }
}

impl CompressionStrategy for SyntaxStrategy {
    fn chunks(&self, unit: SourceUnit<'_>) -> Result<Vec<CodeChunk>> {
        let grammar = unit.language.tree_sitter_language()?;
        let definition = QueryDefinition::for_language(unit.language)
            .ok_or_else(|| CompressorError::unsupported_language(unit.language.as_str()))?;

        let tree = parse_source(unit.content, &grammar)?;
        let query = CompiledQuery::compile(definition, &grammar)?;
        let matches = query.execute(&tree, unit.content);
        let chunks = CaptureClassifier::new(unit, &query).classify(&matches);

        log::debug!(
            "{}: {} bytes, {} matches, {} chunks",
            unit.language,
            unit.content.len(),
            matches.len(),
            chunks.len()
        );
        Ok(chunks)
    }

    fn assembler(&self) -> ChunkAssembler {
        self.assembler
    }
}

/// Regex driven strategy for languages without a bundled grammar
#[derive(Debug, Clone, Copy)]
pub struct PatternStrategy {
    rules: PatternRules,
    assembler: ChunkAssembler,
}

impl PatternStrategy {
    pub const fn new(collapse_nested: bool) -> Self {
        Self {
            rules: PatternRules,
            assembler: ChunkAssembler::new(collapse_nested),
        }
    }
}

impl CompressionStrategy for PatternStrategy {
    fn chunks(&self, unit: SourceUnit<'_>) -> Result<Vec<CodeChunk>> {
        if !PatternRules::covers(unit.language) {
            return Err(CompressorError::unsupported_language(unit.language.as_str()));
        }
        let chunks = self.rules.extract(unit);
        log::debug!(
            "{} (pattern rules): {} bytes, {} chunks",
            unit.language,
            unit.content.len(),
            chunks.len()
        );
        Ok(chunks)
    }

    fn assembler(&self) -> ChunkAssembler {
        self.assembler
    }
}

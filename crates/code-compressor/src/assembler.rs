use crate::types::CodeChunk;

/// Text placed between consecutive chunks
pub const CHUNK_SEPARATOR: &str = "\n// -----\n";

/// Output when no chunk survives compression
pub const EMPTY_OUTPUT: &str = "// No relevant code found after compression.\n";

/// Orders, deduplicates and joins classified chunks
#[derive(Debug, Clone, Copy)]
pub struct ChunkAssembler {
    collapse_nested: bool,
}

impl ChunkAssembler {
    pub const fn new(collapse_nested: bool) -> Self {
        Self { collapse_nested }
    }

    /// Keep chunks in source order, at most one per start offset
    pub fn retain(&self, mut chunks: Vec<CodeChunk>) -> Vec<CodeChunk> {
        // Stable: equal starts keep classification order, so the first wins
        chunks.sort_by_key(|chunk| chunk.start_byte);

        let mut retained: Vec<CodeChunk> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            if retained
                .last()
                .is_some_and(|last| last.start_byte == chunk.start_byte)
            {
                continue;
            }
            if self.collapse_nested && self.is_covered(&retained, &chunk) {
                log::trace!(
                    "Collapsing {} chunk at byte {} into enclosing chunk",
                    chunk.chunk_type.as_str(),
                    chunk.start_byte
                );
                continue;
            }
            retained.push(chunk);
        }
        retained
    }

    /// Render retained chunks into the final output
    pub fn assemble(&self, chunks: Vec<CodeChunk>) -> String {
        let retained = self.retain(chunks);
        if retained.is_empty() {
            return EMPTY_OUTPUT.to_string();
        }

        let mut output = retained
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join(CHUNK_SEPARATOR);
        output.push('\n');
        output
    }

    fn is_covered(&self, retained: &[CodeChunk], chunk: &CodeChunk) -> bool {
        retained
            .iter()
            .rev()
            .any(|outer| {
                outer.covers_span() && outer.contains_span(chunk.start_byte, chunk.end_byte)
            })
    }
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new(true)
    }
}

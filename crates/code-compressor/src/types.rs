use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Input of a single compression call
#[derive(Debug, Clone, Copy)]
pub struct SourceUnit<'a> {
    /// Raw file content
    pub content: &'a [u8],

    /// Declared language
    pub language: Language,
}

impl<'a> SourceUnit<'a> {
    #[must_use]
    pub const fn new(content: &'a [u8], language: Language) -> Self {
        Self { content, language }
    }

    /// Source text of a byte range; invalid UTF-8 is replaced rather than rejected
    #[must_use]
    pub fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.content.len());
        let start = start.min(end);
        String::from_utf8_lossy(&self.content[start..end]).into_owned()
    }
}

/// A retained piece of compressed output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodeChunk {
    /// Chunk text as it appears in the output
    pub content: String,

    /// Start byte of the originating node
    pub start_byte: usize,

    /// End byte of the originating node
    pub end_byte: usize,

    /// Semantic type of the originating declaration
    pub chunk_type: ChunkType,

    /// How the chunk text was produced
    pub disposition: Disposition,
}

impl CodeChunk {
    /// Create a new code chunk
    #[must_use]
    pub const fn new(
        content: String,
        start_byte: usize,
        end_byte: usize,
        chunk_type: ChunkType,
        disposition: Disposition,
    ) -> Self {
        Self {
            content,
            start_byte,
            end_byte,
            chunk_type,
            disposition,
        }
    }

    /// Check if the chunk text reproduces the whole source span
    #[must_use]
    pub const fn covers_span(&self) -> bool {
        matches!(
            self.disposition,
            Disposition::VerbatimKept | Disposition::KeptWhole
        )
    }

    /// Check if a byte span lies inside this chunk's source span
    #[must_use]
    pub const fn contains_span(&self, start: usize, end: usize) -> bool {
        start >= self.start_byte && end <= self.end_byte
    }
}

/// Terminal state of a classified capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Disposition {
    /// Declarative construct copied verbatim
    VerbatimKept,
    /// Signature kept, body replaced by the placeholder
    Stripped,
    /// Strippable construct without a locatable body, kept whole
    KeptWhole,
}

/// Type of code chunk based on semantic meaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum ChunkType {
    /// Standalone function
    Function,
    /// Method inside a class or receiver-bound function
    Method,
    /// Class definition
    Class,
    /// Struct definition
    Struct,
    /// Enum definition
    Enum,
    /// Union definition
    Union,
    /// Interface/Trait/Protocol definition
    Interface,
    /// Type declaration or alias
    Type,
    /// Implementation or extension block
    Impl,
    /// Constant
    Const,
    /// Preprocessor macro
    Macro,
    /// Function prototype without a body
    Prototype,
    /// Decorator or annotation
    Decorator,
    /// Import/use/include statement
    Import,
    /// Package/module clause
    Package,
    /// Re-export or exported value
    Export,
    /// Top-level shell command
    Command,
    /// Variable assignment
    Variable,
    /// Stylesheet rule, at-rule or declaration
    Rule,
    /// Markup tag
    Tag,
    /// Comment
    Comment,
}

impl ChunkType {
    /// Check if this is a declaration type (vs usage)
    #[must_use]
    pub const fn is_declaration(self) -> bool {
        !matches!(
            self,
            Self::Import | Self::Package | Self::Comment | Self::Command | Self::Tag
        )
    }

    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Enum => "enum",
            Self::Union => "union",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Impl => "impl",
            Self::Const => "const",
            Self::Macro => "macro",
            Self::Prototype => "prototype",
            Self::Decorator => "decorator",
            Self::Import => "import",
            Self::Package => "package",
            Self::Export => "export",
            Self::Command => "command",
            Self::Variable => "variable",
            Self::Rule => "rule",
            Self::Tag => "tag",
            Self::Comment => "comment",
        }
    }
}

/// Size accounting for one or more compressed files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
}

impl CompressionStats {
    #[must_use]
    pub const fn measure(original: &[u8], compressed: &str) -> Self {
        Self {
            original_bytes: original.len(),
            compressed_bytes: compressed.len(),
        }
    }

    /// Compressed size as a fraction of the original (1.0 for empty input)
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.original_bytes == 0 {
            return 1.0;
        }
        self.compressed_bytes as f64 / self.original_bytes as f64
    }

    /// Accumulate another measurement
    pub fn add(&mut self, other: Self) {
        self.original_bytes = self.original_bytes.saturating_add(other.original_bytes);
        self.compressed_bytes = self.compressed_bytes.saturating_add(other.compressed_bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_span_containment() {
        let chunk = CodeChunk::new(
            "type T struct{}".to_string(),
            10,
            40,
            ChunkType::Type,
            Disposition::VerbatimKept,
        );
        assert!(chunk.covers_span());
        assert!(chunk.contains_span(10, 40));
        assert!(chunk.contains_span(12, 20));
        assert!(!chunk.contains_span(9, 20));
        assert!(!chunk.contains_span(30, 41));
    }

    #[test]
    fn test_stripped_chunk_does_not_cover_span() {
        let chunk = CodeChunk::new(
            "func f() { ... } // Body removed".to_string(),
            0,
            100,
            ChunkType::Function,
            Disposition::Stripped,
        );
        assert!(!chunk.covers_span());
    }

    #[test]
    fn test_source_unit_text_is_lossy_and_clamped() {
        let unit = SourceUnit::new(b"ab\xffcd", Language::C);
        assert_eq!(unit.text(0, 2), "ab");
        assert_eq!(unit.text(3, 99), "cd");
        assert_eq!(unit.text(2, 3), "\u{fffd}");
        assert_eq!(unit.text(9, 4), "");
    }

    #[test]
    fn test_stats_ratio() {
        let mut stats = CompressionStats::measure(b"0123456789", "01234");
        assert!((stats.ratio() - 0.5).abs() < f64::EPSILON);
        stats.add(CompressionStats::measure(b"0123456789", "0123456789"));
        assert_eq!(stats.original_bytes, 20);
        assert_eq!(stats.compressed_bytes, 15);
        assert!((CompressionStats::default().ratio() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_chunk_type_names() {
        assert_eq!(ChunkType::Function.as_str(), "function");
        assert!(ChunkType::Struct.is_declaration());
        assert!(!ChunkType::Comment.is_declaration());
    }
}

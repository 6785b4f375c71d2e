//! Line and pattern based compression for languages without a bundled grammar.
//!
//! Each language has an ordered rule table. Rules either keep their match as
//! is or cut a declaration header at its opening brace. Results are offsets
//! into the source, so they flow through the same assembler as syntax chunks.

use crate::language::{BodyStyle, Language};
use crate::types::{ChunkType, CodeChunk, Disposition, SourceUnit};
use once_cell::sync::Lazy;
use regex::Regex;

/// Words that look like a call followed by a block but never declare anything
const CONTROL_KEYWORDS: &[&str] = &[
    "if",
    "else",
    "for",
    "while",
    "do",
    "switch",
    "try",
    "catch",
    "synchronized",
    "return",
    "new",
    "throw",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleAction {
    /// Keep the matched text
    Keep,
    /// Match ends at `{`; keep the header and append the placeholder
    Header,
}

struct PatternRule {
    regex: Regex,
    chunk_type: ChunkType,
    action: RuleAction,
}

impl PatternRule {
    fn new(pattern: &str, chunk_type: ChunkType, action: RuleAction) -> Self {
        Self {
            regex: Regex::new(pattern).expect("fallback rule pattern must compile"),
            chunk_type,
            action,
        }
    }

    fn keep(pattern: &str, chunk_type: ChunkType) -> Self {
        Self::new(pattern, chunk_type, RuleAction::Keep)
    }

    fn header(pattern: &str, chunk_type: ChunkType) -> Self {
        Self::new(pattern, chunk_type, RuleAction::Header)
    }
}

/// `//` only opens a comment at line start or after a blank, which keeps
/// `http://` inside string literals out
const LINE_COMMENT: &str = r"(?m)(?:^|[ \t])//[^\n]*";
const BLOCK_COMMENT: &str = r"(?s)/\*.*?\*/";

static RUST_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::keep(LINE_COMMENT, ChunkType::Comment),
        PatternRule::keep(BLOCK_COMMENT, ChunkType::Comment),
        PatternRule::keep(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?use\s+[^;]+;",
            ChunkType::Import,
        ),
        // Blocks without nested braces carry only fields, variants or
        // required items, so they are kept whole
        PatternRule::keep(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?struct\s+\w+[^{};\n]*\{[^{}]*\}",
            ChunkType::Struct,
        ),
        PatternRule::keep(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?enum\s+\w+[^{};\n]*\{[^{}]*\}",
            ChunkType::Enum,
        ),
        PatternRule::keep(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?(?:unsafe\s+)?trait\s+\w+[^{};\n]*\{[^{}]*\}",
            ChunkType::Interface,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?(?:struct|enum|union)\s+\w+[^{};\n]*\{",
            ChunkType::Struct,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?(?:unsafe\s+)?trait\s+\w+[^{};\n]*\{",
            ChunkType::Interface,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:unsafe\s+)?impl\b[^{};\n]*\{",
            ChunkType::Impl,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?mod\s+\w+\s*\{",
            ChunkType::Package,
        ),
        PatternRule::header(
            r#"(?m)^[ \t]*(?:pub(?:\([^)\n]*\))?\s+)?(?:(?:const|async|unsafe|extern\s+"[^"\n]*")\s+)*fn\s+\w+[^{};\n]*\{"#,
            ChunkType::Function,
        ),
    ]
});

static JAVA_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::keep(LINE_COMMENT, ChunkType::Comment),
        PatternRule::keep(BLOCK_COMMENT, ChunkType::Comment),
        PatternRule::keep(r"(?m)^[ \t]*package\s+[^;\n]+;", ChunkType::Package),
        PatternRule::keep(r"(?m)^[ \t]*import\s+[^;\n]+;", ChunkType::Import),
        PatternRule::header(
            r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract|sealed|strictfp)\s+)*(?:class|record)\s+\w+[^{};\n]*\{",
            ChunkType::Class,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:(?:public|private|protected|static|sealed)\s+)*@?interface\s+\w+[^{};\n]*\{",
            ChunkType::Interface,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:(?:public|private|protected|static)\s+)*enum\s+\w+[^{};\n]*\{",
            ChunkType::Enum,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)*(?:<[^>\n]+>\s+)?(?:(?P<lead>[\w.$]+(?:<[^>\n]*>)?(?:\[\])*)\s+)?(?P<name>\w+)\s*\([^)\n]*\)(?:\s*throws\s+[\w.,\s]+?)?\s*\{",
            ChunkType::Method,
        ),
    ]
});

static SWIFT_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::keep(LINE_COMMENT, ChunkType::Comment),
        PatternRule::keep(BLOCK_COMMENT, ChunkType::Comment),
        PatternRule::keep(r"(?m)^[ \t]*import\s+[\w.]+", ChunkType::Import),
        PatternRule::header(
            r"(?m)^[ \t]*(?:@\w+\s+)*(?:(?:public|private|fileprivate|internal|open|final)\s+)*(?:class|actor)\s+\w+[^{}\n]*\{",
            ChunkType::Class,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:@\w+\s+)*(?:(?:public|private|fileprivate|internal)\s+)*struct\s+\w+[^{}\n]*\{",
            ChunkType::Struct,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:@\w+\s+)*(?:(?:public|private|fileprivate|internal)\s+)*protocol\s+\w+[^{}\n]*\{",
            ChunkType::Interface,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:@\w+\s+)*(?:(?:public|private|fileprivate|internal|indirect)\s+)*enum\s+\w+[^{}\n]*\{",
            ChunkType::Enum,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:(?:public|private|fileprivate|internal)\s+)*extension\s+[\w.]+[^{}\n]*\{",
            ChunkType::Impl,
        ),
        PatternRule::header(
            r"(?m)^[ \t]*(?:@\w+\s+)*(?:(?:public|private|fileprivate|internal|open|static|class|final|override|mutating|nonmutating|convenience|required)\s+)*(?:func\s+[^\s(]+|init[?!]?|deinit)[^{}\n]*\{",
            ChunkType::Function,
        ),
    ]
});

static HTML_RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule::keep(r"(?s)<!--.*?-->", ChunkType::Comment),
        PatternRule::keep(r"(?i)<!DOCTYPE[^>]*>", ChunkType::Tag),
        PatternRule::keep(r"(?i)</?(?:html|head|body)\b[^>]*>", ChunkType::Tag),
        PatternRule::keep(r"(?i)<(?:meta|link|base)\b[^>]*>", ChunkType::Tag),
        PatternRule::keep(r"(?is)<title\b[^>]*>.*?</title>", ChunkType::Tag),
        PatternRule::keep(r"(?i)<(?:script|style)\b[^>]*>", ChunkType::Tag),
    ]
});

/// Regex rule tables for languages without a bundled grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternRules;

impl PatternRules {
    /// Check whether a language has a rule table
    pub const fn covers(language: Language) -> bool {
        matches!(
            language,
            Language::Rust | Language::Java | Language::Swift | Language::Html
        )
    }

    /// Extract chunks for a source unit. Languages without rules yield nothing.
    pub fn extract(&self, unit: SourceUnit<'_>) -> Vec<CodeChunk> {
        let rules: &[PatternRule] = match unit.language {
            Language::Rust => RUST_RULES.as_slice(),
            Language::Java => JAVA_RULES.as_slice(),
            Language::Swift => SWIFT_RULES.as_slice(),
            Language::Html => HTML_RULES.as_slice(),
            _ => return Vec::new(),
        };

        let text = String::from_utf8_lossy(unit.content);
        let mut chunks = Vec::new();
        for rule in rules {
            for caps in rule.regex.captures_iter(&text) {
                let Some(whole) = caps.get(0) else {
                    continue;
                };
                if Self::is_control_flow(&caps) {
                    continue;
                }

                let matched = whole.as_str();
                let (content, disposition) = match rule.action {
                    RuleAction::Keep => (matched.trim().to_string(), Disposition::VerbatimKept),
                    RuleAction::Header => {
                        let header = matched.trim_end_matches('{').trim();
                        (
                            format!("{header}{}", BodyStyle::Generic.placeholder()),
                            Disposition::Stripped,
                        )
                    }
                };
                if content.is_empty() {
                    continue;
                }

                // Leading indentation is part of the match; start at the text
                let indent = matched.len() - matched.trim_start().len();
                let chunk_type = rule.chunk_type;
                chunks.push(CodeChunk::new(
                    content,
                    whole.start() + indent,
                    whole.end(),
                    chunk_type,
                    disposition,
                ));
            }
        }

        log::trace!(
            "Pattern rules for {} produced {} chunks",
            unit.language,
            chunks.len()
        );
        chunks
    }

    fn is_control_flow(caps: &regex::Captures<'_>) -> bool {
        ["lead", "name"].iter().any(|group| {
            caps.name(group)
                .is_some_and(|m| CONTROL_KEYWORDS.contains(&m.as_str()))
        })
    }
}

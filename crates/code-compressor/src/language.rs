use crate::error::{CompressorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Supported programming language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Python,
    JavaScript,
    Bash,
    C,
    Css,
    Html,
    Rust,
    Java,
    Swift,
}

impl Language {
    /// Every registered language
    pub const ALL: [Language; 10] = [
        Language::Go,
        Language::Python,
        Language::JavaScript,
        Language::Bash,
        Language::C,
        Language::Css,
        Language::Html,
        Language::Rust,
        Language::Java,
        Language::Swift,
    ];

    /// Resolve a file extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "go" => Ok(Language::Go),
            "py" => Ok(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Ok(Language::JavaScript),
            "sh" | "bash" => Ok(Language::Bash),
            "c" | "h" => Ok(Language::C),
            "css" => Ok(Language::Css),
            "html" | "htm" => Ok(Language::Html),
            "rs" => Ok(Language::Rust),
            "java" => Ok(Language::Java),
            "swift" => Ok(Language::Swift),
            _ => Err(CompressorError::unsupported_language(format!(".{normalized}"))),
        }
    }

    /// Resolve the language of a file path from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                CompressorError::unsupported_language(path.display().to_string())
            })?;
        Self::from_extension(ext)
    }

    /// Resolve a language identifier such as `"go"` or `"JavaScript"`
    pub fn from_identifier(id: &str) -> Result<Self> {
        let lowered = id.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str() == lowered)
            .ok_or_else(|| CompressorError::unsupported_language(id))
    }

    /// Get language identifier as string
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Bash => "bash",
            Language::C => "c",
            Language::Css => "css",
            Language::Html => "html",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Swift => "swift",
        }
    }

    /// Check if a tree-sitter grammar is registered for this language.
    /// Languages without one go through the pattern fallback.
    pub const fn has_grammar(self) -> bool {
        matches!(
            self,
            Language::Go
                | Language::Python
                | Language::JavaScript
                | Language::Bash
                | Language::C
                | Language::Css
        )
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Go => Ok(tree_sitter_go::LANGUAGE.into()),
            Language::Python => Ok(tree_sitter_python::LANGUAGE.into()),
            Language::JavaScript => Ok(tree_sitter_javascript::LANGUAGE.into()),
            Language::Bash => Ok(tree_sitter_bash::LANGUAGE.into()),
            Language::C => Ok(tree_sitter_c::LANGUAGE.into()),
            Language::Css => Ok(tree_sitter_css::LANGUAGE.into()),
            _ => Err(CompressorError::unsupported_language(self.as_str())),
        }
    }

    /// How bodies are delimited, which decides the signature boundary and placeholder
    pub const fn body_style(self) -> BodyStyle {
        match self {
            Language::Python => BodyStyle::Indentation,
            Language::Bash => BodyStyle::Shell,
            _ => BodyStyle::Braces,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CompressorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_identifier(s)
    }
}

/// Body delimiting family of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyStyle {
    /// `{ ... }` blocks; the body node starts at the opening brace
    Braces,
    /// Header ends with `:` and the body is an indented block
    Indentation,
    /// Shell functions
    Shell,
    /// Best-effort header extraction without a parse tree
    Generic,
}

impl BodyStyle {
    /// Literal suffix appended in place of an elided body
    pub const fn placeholder(self) -> &'static str {
        match self {
            BodyStyle::Braces => " { ... } // Body removed",
            BodyStyle::Indentation | BodyStyle::Shell => " { ... } # Body removed",
            BodyStyle::Generic => " { ... }",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("go").unwrap(), Language::Go);
        assert_eq!(Language::from_extension(".py").unwrap(), Language::Python);
        assert_eq!(Language::from_extension("TSX").unwrap(), Language::JavaScript);
        assert_eq!(Language::from_extension("cjs").unwrap(), Language::JavaScript);
        assert_eq!(Language::from_extension("bash").unwrap(), Language::Bash);
        assert_eq!(Language::from_extension("h").unwrap(), Language::C);
        assert_eq!(Language::from_extension("htm").unwrap(), Language::Html);
        assert_eq!(Language::from_extension("rs").unwrap(), Language::Rust);
        assert_eq!(Language::from_extension("swift").unwrap(), Language::Swift);
    }

    #[test]
    fn test_unregistered_extension() {
        let err = Language::from_extension(".xyz").unwrap_err();
        assert!(matches!(err, CompressorError::UnsupportedLanguage(ref ext) if ext == ".xyz"));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("cmd/main.go").unwrap(), Language::Go);
        assert_eq!(Language::from_path("web/app.mjs").unwrap(), Language::JavaScript);
        assert!(Language::from_path("Makefile").is_err());
        assert!(Language::from_path("notes.xyz").is_err());
    }

    #[test]
    fn test_identifier_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_identifier(lang.as_str()).unwrap(), lang);
        }
        assert_eq!("JavaScript".parse::<Language>().unwrap(), Language::JavaScript);
        assert!(Language::from_identifier("typescript").is_err());
    }

    #[test]
    fn test_grammar_registration() {
        for lang in Language::ALL {
            assert_eq!(lang.tree_sitter_language().is_ok(), lang.has_grammar());
        }
        assert!(!Language::Rust.has_grammar());
        assert!(!Language::Html.has_grammar());
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            Language::Go.body_style().placeholder(),
            " { ... } // Body removed"
        );
        assert_eq!(
            Language::Python.body_style().placeholder(),
            " { ... } # Body removed"
        );
        assert_eq!(
            Language::Bash.body_style().placeholder(),
            " { ... } # Body removed"
        );
        assert_eq!(BodyStyle::Generic.placeholder(), " { ... }");
    }
}

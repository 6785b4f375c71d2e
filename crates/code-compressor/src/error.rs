use thiserror::Error;

/// Result type for compressor operations
pub type Result<T> = std::result::Result<T, CompressorError>;

/// Errors that can occur during code compression
///
/// Every variant is a soft failure for callers: the file keeps its original
/// content and ingestion carries on.
#[derive(Error, Debug)]
pub enum CompressorError {
    /// Extension or language identifier is not registered
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Query definition does not compile against the grammar
    #[error("Query compile error for {language}: {message}")]
    QueryCompile { language: String, message: String },

    /// Parser could not be set up for the grammar
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompressorError {
    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create a query compile error
    pub fn query_compile(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::QueryCompile {
            language: language.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True when the failure is a configuration defect for the whole language
    /// rather than something specific to one file.
    #[must_use]
    pub const fn is_language_wide(&self) -> bool {
        matches!(self, Self::QueryCompile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CompressorError::unsupported_language(".xyz");
        assert_eq!(err.to_string(), "Unsupported language: .xyz");

        let err = CompressorError::query_compile("go", "bad node type");
        assert_eq!(err.to_string(), "Query compile error for go: bad node type");
        assert!(err.is_language_wide());

        let err = CompressorError::parse("no tree");
        assert!(!err.is_language_wide());
    }
}

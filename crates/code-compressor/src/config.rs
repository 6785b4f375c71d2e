use crate::error::{CompressorError, Result};
use crate::language::Language;
use serde::{Deserialize, Serialize};

/// Configuration for compression behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Drop chunks whose source span sits inside a chunk that is already kept
    /// verbatim (a struct inside a typedef, a declaration inside a CSS rule)
    pub collapse_nested: bool,

    /// Languages to compress (empty = all registered languages)
    pub supported_languages: Vec<String>,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            collapse_nested: true,
            supported_languages: vec![],
        }
    }
}

impl CompressorConfig {
    /// Create config that keeps every capture the queries produce
    pub fn exhaustive() -> Self {
        Self {
            collapse_nested: false,
            ..Default::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| CompressorError::invalid_config(format!("TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check whether a language passes the `supported_languages` filter
    pub fn allows(&self, language: Language) -> bool {
        self.supported_languages.is_empty()
            || self
                .supported_languages
                .iter()
                .any(|id| id.eq_ignore_ascii_case(language.as_str()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for id in &self.supported_languages {
            if Language::from_identifier(id).is_err() {
                return Err(CompressorError::invalid_config(format!(
                    "unknown language in supported_languages: {id}"
                )));
            }
        }
        Ok(())
    }
}

use crate::error::{CompressorError, Result};
use tree_sitter::{Parser, Tree};

/// Parse source bytes with a grammar.
///
/// Malformed input never fails here: tree-sitter recovers and marks the
/// broken regions with `ERROR` nodes. Only parser setup problems are errors.
pub fn parse_source(content: &[u8], grammar: &tree_sitter::Language) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar)
        .map_err(|e| CompressorError::parse(format!("Failed to set language: {e}")))?;

    let tree = parser
        .parse(content, None)
        .ok_or_else(|| CompressorError::parse("Failed to parse source code"))?;

    if tree.root_node().has_error() {
        log::debug!("Source contains syntax errors; continuing with recovered tree");
    }

    Ok(tree)
}

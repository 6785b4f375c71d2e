use crate::error::{CompressorError, Result};
use crate::queries::{CaptureRole, QueryDefinition};
use std::collections::HashSet;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

/// One named capture of a match
#[derive(Debug, Clone, Copy)]
pub struct Capture<'tree> {
    /// Index into the query's capture names
    pub index: u32,
    pub node: Node<'tree>,
}

/// A pattern instantiation against the tree
#[derive(Debug, Clone)]
pub struct QueryMatch<'tree> {
    pub pattern_index: usize,
    pub captures: Vec<Capture<'tree>>,
}

/// A query compiled for one grammar, with capture roles resolved up front
pub struct CompiledQuery {
    query: Query,
    roles: Vec<CaptureRole>,
}

impl CompiledQuery {
    /// Compile a query definition against its grammar
    pub fn compile(
        definition: &QueryDefinition,
        grammar: &tree_sitter::Language,
    ) -> Result<Self> {
        let query = Query::new(grammar, definition.source).map_err(|e| {
            CompressorError::query_compile(definition.language.as_str(), e.to_string())
        })?;

        let roles = query
            .capture_names()
            .iter()
            .map(|name| CaptureRole::from_capture_name(name))
            .collect();

        Ok(Self { query, roles })
    }

    /// Role of a capture index
    pub fn role(&self, index: u32) -> CaptureRole {
        self.roles
            .get(index as usize)
            .copied()
            .unwrap_or_else(|| CaptureRole::from_capture_name(""))
    }

    /// Name of a capture index
    pub fn capture_name(&self, index: u32) -> &str {
        self.query
            .capture_names()
            .get(index as usize)
            .copied()
            .unwrap_or("")
    }

    /// Run the query over the whole tree.
    ///
    /// Overlapping patterns can report the same match more than once; those
    /// repeats are dropped. Distinct matches come back in cursor order.
    pub fn execute<'tree>(&self, tree: &'tree Tree, source: &[u8]) -> Vec<QueryMatch<'tree>> {
        let mut cursor = QueryCursor::new();
        let mut seen: HashSet<(usize, Vec<(u32, usize, usize)>)> = HashSet::new();
        let mut out = Vec::new();

        let mut matches = cursor.matches(&self.query, tree.root_node(), source);
        while let Some(m) = matches.next() {
            let key = (
                m.pattern_index,
                m.captures
                    .iter()
                    .map(|c| (c.index, c.node.start_byte(), c.node.end_byte()))
                    .collect::<Vec<_>>(),
            );
            if !seen.insert(key) {
                continue;
            }
            out.push(QueryMatch {
                pattern_index: m.pattern_index,
                captures: m
                    .captures
                    .iter()
                    .map(|c| Capture {
                        index: c.index,
                        node: c.node,
                    })
                    .collect(),
            });
        }

        out
    }
}

use crate::language::{BodyStyle, Language};
use crate::queries::{Category, Marker};
use crate::query::{CompiledQuery, QueryMatch};
use crate::types::{ChunkType, CodeChunk, Disposition, SourceUnit};
use std::collections::HashSet;
use tree_sitter::Node;

/// JavaScript node kinds that carry a strippable `body` field
const JS_DECLARATION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "class_declaration",
    "method_definition",
    "function_expression",
    "generator_function",
    "arrow_function",
    "class",
];

/// JavaScript expressions that can be bound to a name and stripped
const JS_FUNCTION_VALUE_KINDS: &[&str] =
    &["arrow_function", "function_expression", "generator_function"];

/// Turns query captures into code chunks.
///
/// Every capture ends up kept verbatim, stripped down to its signature, or
/// kept whole when no body can be located. A node start offset is handled at
/// most once.
pub struct CaptureClassifier<'a> {
    unit: SourceUnit<'a>,
    query: &'a CompiledQuery,
    processed: HashSet<usize>,
    chunks: Vec<CodeChunk>,
}

impl<'a> CaptureClassifier<'a> {
    pub fn new(unit: SourceUnit<'a>, query: &'a CompiledQuery) -> Self {
        Self {
            unit,
            query,
            processed: HashSet::new(),
            chunks: Vec::new(),
        }
    }

    /// Classify all matches. Matches are visited in pattern declaration order so
    /// that earlier patterns decide how a shared node is rendered.
    pub fn classify(mut self, matches: &[QueryMatch<'_>]) -> Vec<CodeChunk> {
        let mut ordered: Vec<&QueryMatch<'_>> = matches.iter().collect();
        ordered.sort_by_key(|m| m.pattern_index);

        for m in ordered {
            for capture in &m.captures {
                let node = capture.node;
                if self.processed.contains(&node.start_byte()) {
                    continue;
                }

                let chunk = match self.query.role(capture.index).category {
                    Category::Unrecognized => continue,
                    Category::Verbatim(chunk_type) => self.verbatim(node, chunk_type),
                    Category::Strippable(chunk_type) => self.strip(m, node, chunk_type),
                };

                if chunk.content.is_empty() {
                    continue;
                }

                log::trace!(
                    "@{} {} -> {:?}",
                    self.query.capture_name(capture.index),
                    node.kind(),
                    chunk.disposition
                );
                self.processed.insert(node.start_byte());
                self.chunks.push(chunk);
            }
        }

        self.chunks
    }

    fn verbatim(&self, node: Node<'_>, chunk_type: ChunkType) -> CodeChunk {
        self.whole(node, chunk_type, Disposition::VerbatimKept)
    }

    fn kept_whole(&self, node: Node<'_>, chunk_type: ChunkType) -> CodeChunk {
        log::debug!(
            "No body located for {} at byte {}; keeping it whole",
            node.kind(),
            node.start_byte()
        );
        self.whole(node, chunk_type, Disposition::KeptWhole)
    }

    fn whole(&self, node: Node<'_>, chunk_type: ChunkType, disposition: Disposition) -> CodeChunk {
        let text = self.unit.text(node.start_byte(), node.end_byte());
        CodeChunk::new(
            text.trim().to_string(),
            node.start_byte(),
            node.end_byte(),
            chunk_type,
            disposition,
        )
    }

    fn stripped(&self, node: Node<'_>, signature: &str, chunk_type: ChunkType) -> CodeChunk {
        let placeholder = self.unit.language.body_style().placeholder();
        CodeChunk::new(
            format!("{}{placeholder}", signature.trim()),
            node.start_byte(),
            node.end_byte(),
            chunk_type,
            Disposition::Stripped,
        )
    }

    fn strip(&mut self, m: &QueryMatch<'_>, node: Node<'_>, chunk_type: ChunkType) -> CodeChunk {
        if let Some(chunk) = self.strip_expression_binding(m, node, chunk_type) {
            return chunk;
        }
        if let Some(chunk) = self.strip_anonymous(m, node, chunk_type) {
            return chunk;
        }

        let Some(declaration) = self.resolve_declaration(node) else {
            return self.kept_whole(node, chunk_type);
        };
        self.mark_path(declaration, node);

        let Some(body) = declaration.child_by_field_name("body") else {
            return self.kept_whole(node, chunk_type);
        };

        let signature_end = self.signature_end(declaration, body);
        if signature_end <= node.start_byte() || signature_end > node.end_byte() {
            return self.kept_whole(node, chunk_type);
        }

        let signature = self.unit.text(node.start_byte(), signature_end);
        if signature.trim().is_empty() {
            return self.kept_whole(node, chunk_type);
        }
        self.stripped(node, &signature, chunk_type)
    }

    /// `const sq = (x) => x * x` has no block to cut at, so the signature is
    /// rebuilt from the binding keyword, name and parameters.
    fn strip_expression_binding(
        &mut self,
        m: &QueryMatch<'_>,
        node: Node<'_>,
        chunk_type: ChunkType,
    ) -> Option<CodeChunk> {
        let name = self.marker_node(m, Marker::BindingName)?;
        let value = self.marker_node(m, Marker::BindingValue)?;
        if value.kind() != "arrow_function" {
            return None;
        }
        let body = value.child_by_field_name("body")?;
        if body.kind() == "statement_block" {
            return None;
        }

        let params = value
            .child_by_field_name("parameters")
            .or_else(|| value.child_by_field_name("parameter"))?;
        let binding = name.parent().and_then(|declarator| declarator.parent())?;
        let keyword = binding.child(0)?;

        let export = if node.kind() == "export_statement" {
            "export "
        } else {
            ""
        };
        let is_async = value.child(0).is_some_and(|first| first.kind() == "async");
        let signature = format!(
            "{export}{} {} = {}{} =>",
            self.node_text(keyword),
            self.node_text(name),
            if is_async { "async " } else { "" },
            self.node_text(params),
        );

        self.mark_path(value, node);
        Some(self.stripped(node, &signature, chunk_type))
    }

    /// `export default function () {}` has no name to anchor on; its
    /// signature is the canonical form for its kind.
    fn strip_anonymous(
        &mut self,
        m: &QueryMatch<'_>,
        node: Node<'_>,
        chunk_type: ChunkType,
    ) -> Option<CodeChunk> {
        let anonymous = self.marker_node(m, Marker::Anonymous)?;
        if anonymous.child_by_field_name("name").is_some() {
            return None;
        }
        anonymous.child_by_field_name("body")?;

        let is_async = anonymous
            .child(0)
            .is_some_and(|first| first.kind() == "async");
        let prefix = if is_async { "async " } else { "" };
        let signature = match anonymous.kind() {
            "function_expression" => format!("export default {prefix}function()"),
            "generator_function" => format!("export default {prefix}function*()"),
            "class" => "export default class".to_string(),
            _ => return None,
        };

        self.mark_path(anonymous, node);
        Some(self.stripped(node, &signature, chunk_type))
    }

    /// Find the node that owns the `body` field for a captured node
    fn resolve_declaration<'tree>(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        if self.unit.language != Language::JavaScript {
            return Some(node);
        }

        match node.kind() {
            "export_statement" => {
                if let Some(declaration) = node.child_by_field_name("declaration") {
                    return match declaration.kind() {
                        "lexical_declaration" | "variable_declaration" => {
                            Self::resolve_binding(declaration)
                        }
                        kind if JS_DECLARATION_KINDS.contains(&kind) => Some(declaration),
                        _ => None,
                    };
                }
                let mut cursor = node.walk();
                let found = node
                    .named_children(&mut cursor)
                    .find(|child| JS_DECLARATION_KINDS.contains(&child.kind()));
                found
            }
            "lexical_declaration" | "variable_declaration" => Self::resolve_binding(node),
            kind if JS_DECLARATION_KINDS.contains(&kind) => Some(node),
            _ => None,
        }
    }

    /// First declarator whose value is a function with a body
    fn resolve_binding(declaration: Node<'_>) -> Option<Node<'_>> {
        let mut cursor = declaration.walk();
        let found = declaration
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| declarator.child_by_field_name("value"))
            .find(|value| {
                JS_FUNCTION_VALUE_KINDS.contains(&value.kind())
                    && value.child_by_field_name("body").is_some()
            });
        found
    }

    fn signature_end(&self, declaration: Node<'_>, body: Node<'_>) -> usize {
        match self.unit.language.body_style() {
            BodyStyle::Indentation => {
                let mut cursor = declaration.walk();
                let colon = declaration
                    .children(&mut cursor)
                    .find(|child| child.kind() == ":");
                colon.map_or(body.start_byte(), |colon| colon.end_byte())
            }
            BodyStyle::Braces | BodyStyle::Shell | BodyStyle::Generic => body.start_byte(),
        }
    }

    /// Record the nodes between an inner declaration and its captured wrapper
    /// so their own patterns do not emit them a second time.
    fn mark_path(&mut self, inner: Node<'_>, captured: Node<'_>) {
        let mut current = inner;
        while current.id() != captured.id() {
            self.processed.insert(current.start_byte());
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    fn marker_node<'tree>(&self, m: &QueryMatch<'tree>, marker: Marker) -> Option<Node<'tree>> {
        m.captures
            .iter()
            .find(|c| self.query.role(c.index).marker == Some(marker))
            .map(|c| c.node)
    }

    fn node_text(&self, node: Node<'_>) -> String {
        self.unit
            .text(node.start_byte(), node.end_byte())
            .trim()
            .to_string()
    }
}

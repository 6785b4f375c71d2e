//! Per-language tree-sitter query definitions.
//!
//! Each definition is a list of patterns. The outer capture of a pattern names
//! what the match is (`@comment`, `@definition.function`, ...); inner captures
//! such as `@binding.name` are markers the classifier reads while handling the
//! outer capture. Earlier patterns win when two of them capture the same node.

use crate::language::Language;
use crate::types::ChunkType;

/// Static query source for one language
#[derive(Debug, Clone, Copy)]
pub struct QueryDefinition {
    pub language: Language,
    pub source: &'static str,
}

impl QueryDefinition {
    /// Look up the definition registered for a language
    pub fn for_language(language: Language) -> Option<&'static QueryDefinition> {
        DEFINITIONS.iter().find(|def| def.language == language)
    }
}

/// What the classifier does with a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Emit the node text unchanged
    Verbatim(ChunkType),
    /// Emit the signature and replace the body with the placeholder
    Strippable(ChunkType),
    /// Helper capture, never emitted on its own
    Unrecognized,
}

/// Helper captures consulted while stripping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Identifier a function-valued expression is bound to
    BindingName,
    /// The function-valued expression itself
    BindingValue,
    /// Unnamed function or class behind `export default`
    Anonymous,
}

/// Category and marker of one capture name, resolved once per compiled query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRole {
    pub category: Category,
    pub marker: Option<Marker>,
}

impl CaptureRole {
    /// Resolve a capture name
    pub fn from_capture_name(name: &str) -> Self {
        let category = match name {
            "comment" => Category::Verbatim(ChunkType::Comment),
            "import" => Category::Verbatim(ChunkType::Import),
            "package" => Category::Verbatim(ChunkType::Package),
            "decorator" => Category::Verbatim(ChunkType::Decorator),
            "definition.type" | "definition.typedef" => Category::Verbatim(ChunkType::Type),
            "definition.struct" => Category::Verbatim(ChunkType::Struct),
            "definition.enum" => Category::Verbatim(ChunkType::Enum),
            "definition.union" => Category::Verbatim(ChunkType::Union),
            "definition.constant" => Category::Verbatim(ChunkType::Const),
            "definition.macro" => Category::Verbatim(ChunkType::Macro),
            "definition.prototype" => Category::Verbatim(ChunkType::Prototype),
            "export.other" => Category::Verbatim(ChunkType::Export),
            "command" => Category::Verbatim(ChunkType::Command),
            "assignment" => Category::Verbatim(ChunkType::Variable),
            "rule_set" | "media" | "keyframes" | "declaration" => {
                Category::Verbatim(ChunkType::Rule)
            }
            "definition.function" => Category::Strippable(ChunkType::Function),
            "definition.method" => Category::Strippable(ChunkType::Method),
            "definition.class" => Category::Strippable(ChunkType::Class),
            _ => Category::Unrecognized,
        };
        let marker = match name {
            "binding.name" => Some(Marker::BindingName),
            "binding.value" => Some(Marker::BindingValue),
            "anonymous" => Some(Marker::Anonymous),
            _ => None,
        };
        Self { category, marker }
    }
}

static DEFINITIONS: &[QueryDefinition] = &[
    QueryDefinition {
        language: Language::Go,
        source: GO_QUERY,
    },
    QueryDefinition {
        language: Language::Python,
        source: PYTHON_QUERY,
    },
    QueryDefinition {
        language: Language::JavaScript,
        source: JAVASCRIPT_QUERY,
    },
    QueryDefinition {
        language: Language::Bash,
        source: BASH_QUERY,
    },
    QueryDefinition {
        language: Language::C,
        source: C_QUERY,
    },
    QueryDefinition {
        language: Language::Css,
        source: CSS_QUERY,
    },
];

const GO_QUERY: &str = r#"
(package_clause) @package
(import_declaration) @import
(type_declaration) @definition.type
(source_file (const_declaration) @definition.constant)
(function_declaration name: (identifier) @name) @definition.function
(method_declaration name: (field_identifier) @name) @definition.method
(comment) @comment
"#;

const PYTHON_QUERY: &str = r#"
(import_statement) @import
(import_from_statement) @import
(future_import_statement) @import
(decorator) @decorator
(function_definition name: (identifier) @name) @definition.function
(class_definition name: (identifier) @name) @definition.class
(comment) @comment
"#;

const BASH_QUERY: &str = r#"
(function_definition name: (word) @name) @definition.function
(program (command) @command)
(program (variable_assignment) @assignment)
(comment) @comment
"#;

const C_QUERY: &str = r#"
(preproc_include) @import
(preproc_def) @definition.macro
(preproc_function_def) @definition.macro
(function_definition) @definition.function
(translation_unit (declaration declarator: (function_declarator)) @definition.prototype)
(translation_unit (declaration declarator: (pointer_declarator declarator: (function_declarator))) @definition.prototype)
(struct_specifier name: (type_identifier) body: (field_declaration_list)) @definition.struct
(enum_specifier name: (type_identifier) body: (enumerator_list)) @definition.enum
(union_specifier name: (type_identifier) body: (field_declaration_list)) @definition.union
(type_definition) @definition.typedef
(comment) @comment
"#;

const CSS_QUERY: &str = r#"
(import_statement) @import
(rule_set) @rule_set
(media_statement) @media
(keyframes_statement) @keyframes
(declaration) @declaration
(comment) @comment
"#;

const JAVASCRIPT_QUERY: &str = r#"
(import_statement) @import
(comment) @comment

; exported named declarations: the export wrapper is the captured node
(export_statement
  declaration: (function_declaration name: (identifier))) @definition.function
(export_statement
  declaration: (generator_function_declaration name: (identifier))) @definition.function
(export_statement
  declaration: (class_declaration name: (identifier))) @definition.class

; export default with a named declaration
(export_statement
  "default"
  (function_declaration name: (identifier))) @definition.function
(export_statement
  "default"
  (generator_function_declaration name: (identifier))) @definition.function
(export_statement
  "default"
  (class_declaration name: (identifier))) @definition.class

; export default with an unnamed function or class
(export_statement
  "default"
  value: (function_expression) @anonymous) @definition.function
(export_statement
  "default"
  value: (generator_function) @anonymous) @definition.function
(export_statement
  "default"
  value: (class) @anonymous) @definition.class
(export_statement
  "default"
  value: (arrow_function)) @definition.function

; exported bindings whose value is a function
(export_statement
  declaration: (lexical_declaration
    (variable_declarator
      name: (identifier) @binding.name
      value: [(arrow_function) (function_expression) (generator_function)] @binding.value))) @definition.function
(export_statement
  declaration: (variable_declaration
    (variable_declarator
      name: (identifier) @binding.name
      value: [(arrow_function) (function_expression) (generator_function)] @binding.value))) @definition.function

; standalone declarations
(function_declaration name: (identifier)) @definition.function
(generator_function_declaration name: (identifier)) @definition.function
(class_declaration name: (identifier)) @definition.class
(method_definition name: (_) @name) @definition.method

; bindings whose value is a function
(lexical_declaration
  (variable_declarator
    name: (identifier) @binding.name
    value: [(arrow_function) (function_expression) (generator_function)] @binding.value)) @definition.function
(variable_declaration
  (variable_declarator
    name: (identifier) @binding.name
    value: [(arrow_function) (function_expression) (generator_function)] @binding.value)) @definition.function

; other export forms are kept whole
(export_statement declaration: (lexical_declaration)) @export.other
(export_statement declaration: (variable_declaration)) @export.other
(export_statement (export_clause)) @export.other
(export_statement "*") @export.other
(export_statement value: (identifier)) @export.other
(export_statement value: (string)) @export.other
(export_statement value: (number)) @export.other
(export_statement value: (object)) @export.other
(export_statement value: (array)) @export.other
(export_statement value: (call_expression)) @export.other
"#;

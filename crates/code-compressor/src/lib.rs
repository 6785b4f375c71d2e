//! # Context Code Compressor
//!
//! Structural compression of source files for LLM context windows.
//!
//! ## Philosophy
//!
//! The compressor keeps what tells a reader how code is shaped and drops what
//! only tells a machine what to do:
//! - Declarative constructs (imports, types, comments, rules) are kept verbatim
//! - Functions, methods and classes keep their signature; the body becomes a placeholder
//! - Output order follows the source, and identical input gives identical output
//!
//! ## Architecture
//!
//! ```text
//! (content, language)
//!     │
//!     ├──> Language Resolution (identifier or extension)
//!     │
//!     ├──> SyntaxStrategy (grammar registered)
//!     │    ├─> Tree-sitter Parsing → AST
//!     │    ├─> Query Execution → matches
//!     │    └─> Capture Classification
//!     │         ├─> verbatim
//!     │         ├─> signature + placeholder
//!     │         └─> whole node (no body found)
//!     │
//!     ├──> PatternStrategy (no grammar)
//!     │    └─> Regex rules per language
//!     │
//!     └──> Chunk Assembly
//!          ├─> Sort by offset, dedupe
//!          └─> Join with separator
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_code_compressor::Compressor;
//!
//! let compressor = Compressor::default();
//! let code = b"package main\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n";
//!
//! let compressed = compressor.compress(code, "go").unwrap();
//! assert_eq!(
//!     compressed,
//!     "package main\n// -----\nfunc add(a, b int) int { ... } // Body removed\n"
//! );
//! ```

mod assembler;
mod classifier;
mod compressor;
mod config;
mod error;
mod fallback;
mod language;
mod parser;
mod queries;
mod query;
mod strategy;
mod types;

pub use assembler::{ChunkAssembler, CHUNK_SEPARATOR, EMPTY_OUTPUT};
pub use compressor::Compressor;
pub use config::CompressorConfig;
pub use error::{CompressorError, Result};
pub use language::{BodyStyle, Language};
pub use queries::QueryDefinition;
pub use strategy::{CompressionStrategy, PatternStrategy, SyntaxStrategy};
pub use types::{ChunkType, CodeChunk, CompressionStats, Disposition, SourceUnit};

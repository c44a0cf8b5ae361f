//! Pre-compiled tree-sitter queries for annotated class extraction.
//!
//! This module provides the [`ANNOTATION_QUERY`] constant matching exported
//! classes tagged with a decorator call whose argument is an object literal,
//! and [`get_annotation_query`] for lazily compiling and caching it.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query for exported, decorator-annotated classes.
///
/// The grammar attaches a decorator either as a sibling of the class inside
/// the `export_statement` or as a child of the `class_declaration` itself,
/// depending on source layout, so both shapes are matched.
///
/// # Capture Names
///
/// - `annotation.name` - The decorator's callee identifier (`Component`, ...)
/// - `annotation.args` - The object literal passed to the decorator
/// - `class.name` - The exported class identifier
pub const ANNOTATION_QUERY: &str = r"
; Decorator as a sibling of the exported class:
; @Component({...}) export class Foo {}
(export_statement
  (decorator
    (call_expression
      function: (identifier) @annotation.name
      arguments: (arguments
        (object) @annotation.args)))
  declaration: (class_declaration
    name: (type_identifier) @class.name))

; Decorator nested inside the class declaration
(export_statement
  declaration: (class_declaration
    (decorator
      (call_expression
        function: (identifier) @annotation.name
        arguments: (arguments
          (object) @annotation.args)))
    name: (type_identifier) @class.name))
";

/// Capture index for `annotation.name`.
pub const CAPTURE_ANNOTATION_NAME: u32 = 0;

/// Capture index for `annotation.args`.
pub const CAPTURE_ANNOTATION_ARGS: u32 = 1;

/// Capture index for `class.name`.
pub const CAPTURE_CLASS_NAME: u32 = 2;

/// Global cache for the compiled annotation query.
static COMPILED_QUERY: OnceLock<Query> = OnceLock::new();

/// Returns the compiled annotation query.
///
/// The query is compiled once and cached for all subsequent calls.
/// This function is thread-safe.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_annotation_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_QUERY.get_or_init(|| query))
}

/// Compiles the annotation query for the given language.
fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, ANNOTATION_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

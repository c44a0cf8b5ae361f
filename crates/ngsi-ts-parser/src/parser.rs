//! TypeScript parser management using tree-sitter.
//!
//! This module provides the [`TsParser`] struct for parsing TypeScript
//! sources and declaration files into syntax trees. Extraction of entity
//! metadata from a tree lives in [`annotations`](crate::annotations) and
//! [`declarations`](crate::declarations).

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// TypeScript parser for source and declaration files.
///
/// Wraps a tree-sitter parser configured for TypeScript. The parser can be
/// reused for multiple files to avoid repeated initialization; `.d.ts`
/// declaration files parse with the same grammar as regular sources.
///
/// # Thread Safety
///
/// `TsParser` is `Send` but not `Sync`. For parallel indexing with rayon,
/// create one parser per thread via `map_init`. The compiled queries in
/// [`queries`](crate::queries) are thread-safe and shared across all
/// parser instances.
///
/// # Examples
///
/// ```
/// use ngsi_ts_parser::TsParser;
///
/// let mut parser = TsParser::new()?;
/// let tree = parser.parse("export class Foo {}")?;
/// assert_eq!(tree.root_node().kind(), "program");
/// # Ok::<(), ngsi_ts_parser::ParseError>(())
/// ```
pub struct TsParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The TypeScript language for the parser.
    language: Language,
}

impl TsParser {
    /// Creates a new TypeScript parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the TypeScript language
    /// cannot be set on the parser.
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, language })
    }

    /// Parses TypeScript source code into a syntax tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] if parsing fails (out of memory or
    /// cancelled). Syntactically invalid source still produces a tree with
    /// error nodes rather than failing.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser.parse(source, None).ok_or(ParseError::Parse)
    }

    /// Returns the tree-sitter language used by this parser.
    ///
    /// Useful when creating ad-hoc queries compatible with this parser.
    #[inline]
    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl std::fmt::Debug for TsParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsParser")
            .field("language", &"TypeScript")
            .finish_non_exhaustive()
    }
}

//! TypeScript parsing and entity metadata extraction.
//!
//! This crate turns TypeScript sources and compiled declaration files into
//! the entity tuples the selector index is built from:
//!
//! - [`TsParser`] wraps a tree-sitter parser for TypeScript
//! - [`extract_annotated_classes`] finds exported classes tagged with
//!   `Component`/`Directive`/`Pipe` decorators in project sources
//! - [`extract_with_fallback`] is the regex fallback used when structural
//!   parsing fails or yields nothing
//! - [`extract_declarations`] recovers the same metadata from the
//!   positional type-argument encoding in library `.d.ts` files
//!
//! # Overview
//!
//! ```
//! use ngsi_ts_parser::{TsParser, extract_annotated_classes};
//!
//! let source = r#"
//!     @Component({ selector: 'app-widget', standalone: true })
//!     export class WidgetComponent {}
//! "#;
//!
//! let mut parser = TsParser::new()?;
//! let tree = parser.parse(source)?;
//! let classes = extract_annotated_classes(&tree, source)?;
//!
//! assert_eq!(classes[0].selector, "app-widget");
//! # Ok::<(), ngsi_ts_parser::ParseError>(())
//! ```
//!
//! # Thread Safety
//!
//! [`TsParser`] is `Send` but not `Sync`. For parallel indexing with rayon,
//! create one parser per thread via `map_init`. The compiled queries are
//! thread-safe and shared globally.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod annotations;
pub mod declarations;
pub mod error;
pub mod fallback;
mod parser;
pub mod queries;

// Re-export main types for convenient access
pub use annotations::{AnnotatedClass, AnnotationArgs, extract_annotated_classes};
pub use declarations::{DeclarationUnit, DeclaredEntity, DeclaredModule, extract_declarations};
pub use error::ParseError;
pub use fallback::{extract_with_fallback, kind_from_file_name};
pub use parser::TsParser;

// Re-export tree-sitter types that appear in our public API
pub use tree_sitter::Tree;

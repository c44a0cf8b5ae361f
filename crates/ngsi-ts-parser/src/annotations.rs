//! Annotation extraction from TypeScript sources.
//!
//! This module locates exported class declarations tagged with the three
//! recognized decorators (`Component`, `Directive`, `Pipe`), inspects the
//! decorator's object-literal argument, and yields one [`AnnotatedClass`]
//! per entity. A file may legitimately declare more than one entity.
//!
//! The object-literal "shape sniffing" is confined to
//! [`parse_annotation_args`], which produces the tagged [`AnnotationArgs`]
//! value consumed by the rest of the extraction.

use ngsi_core::ElementKind;
use ngsi_core::FxHashSet;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, QueryCursor, Tree};

use crate::error::ParseError;
use crate::queries::{
    CAPTURE_ANNOTATION_ARGS, CAPTURE_ANNOTATION_NAME, CAPTURE_CLASS_NAME, get_annotation_query,
};

/// The arguments recovered from one decorator's configuration literal.
///
/// Components and directives carry `selector`; pipes carry `name`. Absence
/// of `standalone` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationArgs {
    /// The `selector` property, when present.
    pub selector: Option<String>,

    /// The `name` property (pipe invocation name), when present.
    pub name: Option<String>,

    /// The `standalone` property; `false` when absent.
    pub standalone: bool,
}

/// One exported, annotated class found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedClass {
    /// The exported class identifier.
    pub class_name: String,

    /// The entity kind derived from the decorator name.
    pub kind: ElementKind,

    /// The raw selector (or pipe name) string, unparsed.
    pub selector: String,

    /// Whether the entity declared `standalone: true`.
    pub standalone: bool,
}

/// Extracts every exported, annotated class from a parsed source unit.
///
/// Only classes that are exported and carry a non-empty selector (or pipe
/// name) are indexable; everything else is skipped silently.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the annotation query fails to
/// compile, which indicates a build-level defect rather than bad input.
///
/// # Examples
///
/// ```
/// use ngsi_core::ElementKind;
/// use ngsi_ts_parser::{TsParser, extract_annotated_classes};
///
/// let source = r#"
///     @Component({ selector: 'app-widget', standalone: true })
///     export class WidgetComponent {}
/// "#;
/// let mut parser = TsParser::new()?;
/// let tree = parser.parse(source)?;
///
/// let classes = extract_annotated_classes(&tree, source)?;
/// assert_eq!(classes.len(), 1);
/// assert_eq!(classes[0].kind, ElementKind::Component);
/// assert_eq!(classes[0].selector, "app-widget");
/// assert!(classes[0].standalone);
/// # Ok::<(), ngsi_ts_parser::ParseError>(())
/// ```
pub fn extract_annotated_classes(
    tree: &Tree,
    source: &str,
) -> Result<Vec<AnnotatedClass>, ParseError> {
    let query = get_annotation_query()?;
    let source_bytes = source.as_bytes();
    let root = tree.root_node();

    let mut classes = Vec::new();
    let mut seen: FxHashSet<usize> = FxHashSet::default();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source_bytes);

    while let Some(match_) = matches.next() {
        let mut annotation_name: Option<Node<'_>> = None;
        let mut annotation_args: Option<Node<'_>> = None;
        let mut class_name: Option<Node<'_>> = None;

        for capture in match_.captures {
            match capture.index {
                idx if idx == CAPTURE_ANNOTATION_NAME => annotation_name = Some(capture.node),
                idx if idx == CAPTURE_ANNOTATION_ARGS => annotation_args = Some(capture.node),
                idx if idx == CAPTURE_CLASS_NAME => class_name = Some(capture.node),
                _ => {}
            }
        }

        let (Some(name_node), Some(args_node), Some(class_node)) =
            (annotation_name, annotation_args, class_name)
        else {
            continue;
        };

        // A class can satisfy both query patterns; index it once
        if !seen.insert(class_node.start_byte()) {
            continue;
        }

        let Some(kind) = annotation_kind(name_node, source_bytes) else {
            continue;
        };

        let args = parse_annotation_args(args_node, source_bytes);
        let selector = match kind {
            ElementKind::Pipe => args.name,
            _ => args.selector,
        };
        let Some(selector) = selector.filter(|s| !s.trim().is_empty()) else {
            continue;
        };
        let Some(class_name) = node_text(class_node, source_bytes) else {
            continue;
        };

        classes.push(AnnotatedClass {
            class_name: class_name.to_owned(),
            kind,
            selector,
            standalone: args.standalone,
        });
    }

    // Stable order for callers regardless of pattern match order
    classes.sort_by(|a, b| a.class_name.cmp(&b.class_name));
    Ok(classes)
}

/// Maps a decorator identifier to an entity kind.
fn annotation_kind(node: Node<'_>, source: &[u8]) -> Option<ElementKind> {
    match node_text(node, source)? {
        "Component" => Some(ElementKind::Component),
        "Directive" => Some(ElementKind::Directive),
        "Pipe" => Some(ElementKind::Pipe),
        _ => None,
    }
}

/// Walks a decorator's object-literal argument into [`AnnotationArgs`].
///
/// Only `selector`, `name`, and `standalone` pairs are inspected; string
/// keys (`'selector': ...`) are accepted alongside identifier keys.
fn parse_annotation_args(object: Node<'_>, source: &[u8]) -> AnnotationArgs {
    let mut args = AnnotationArgs::default();

    let mut cursor = object.walk();
    for pair in object.named_children(&mut cursor) {
        if pair.kind() != "pair" {
            continue;
        }
        let (Some(key), Some(value)) = (
            pair.child_by_field_name("key"),
            pair.child_by_field_name("value"),
        ) else {
            continue;
        };
        let Some(key_text) = node_text(key, source).map(strip_quotes) else {
            continue;
        };

        match key_text {
            "selector" => args.selector = string_value(value, source),
            "name" => args.name = string_value(value, source),
            "standalone" => {
                args.standalone = node_text(value, source) == Some("true");
            }
            _ => {}
        }
    }

    args
}

/// Extracts the inner text of a string-literal value node.
fn string_value(node: Node<'_>, source: &[u8]) -> Option<String> {
    match node.kind() {
        "string" | "template_string" => {
            node_text(node, source).map(|t| strip_quotes(t).to_owned())
        }
        _ => None,
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    node.utf8_text(source).ok()
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '\'' || c == '"' || c == '`')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TsParser;

    fn extract(source: &str) -> Vec<AnnotatedClass> {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let tree = parser.parse(source).expect("Parse failed");
        extract_annotated_classes(&tree, source).expect("Extraction failed")
    }

    #[test]
    fn test_component_extraction() {
        let classes = extract(
            r"
            @Component({ selector: 'app-widget' })
            export class WidgetComponent {}
            ",
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].class_name, "WidgetComponent");
        assert_eq!(classes[0].kind, ElementKind::Component);
        assert_eq!(classes[0].selector, "app-widget");
        assert!(!classes[0].standalone);
    }

    #[test]
    fn test_standalone_component() {
        let classes = extract(
            r"
            @Component({ selector: 'app-widget', standalone: true, template: '' })
            export class WidgetComponent {}
            ",
        );
        assert_eq!(classes.len(), 1);
        assert!(classes[0].standalone);
    }

    #[test]
    fn test_multi_selector_directive() {
        let classes = extract(
            r"
            @Directive({ selector: 'a[tuiButton],button[tuiButton]' })
            export class ButtonDirective {}
            ",
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].kind, ElementKind::Directive);
        assert_eq!(classes[0].selector, "a[tuiButton],button[tuiButton]");
    }

    #[test]
    fn test_pipe_uses_name_argument() {
        let classes = extract(
            r"
            @Pipe({ name: 'currency' })
            export class CurrencyPipe {}
            ",
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].kind, ElementKind::Pipe);
        assert_eq!(classes[0].selector, "currency");
    }

    #[test]
    fn test_multiple_entities_per_file() {
        let classes = extract(
            r"
            @Component({ selector: 'app-one' })
            export class OneComponent {}

            @Directive({ selector: '[appTwo]' })
            export class TwoDirective {}
            ",
        );
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].class_name, "OneComponent");
        assert_eq!(classes[1].class_name, "TwoDirective");
    }

    #[test]
    fn test_unexported_class_is_skipped() {
        let classes = extract(
            r"
            @Component({ selector: 'app-private' })
            class PrivateComponent {}
            ",
        );
        assert!(classes.is_empty());
    }

    #[test]
    fn test_undecorated_class_is_skipped() {
        let classes = extract("export class PlainService {}");
        assert!(classes.is_empty());
    }

    #[test]
    fn test_unknown_decorator_is_skipped() {
        let classes = extract(
            r"
            @Injectable({ providedIn: 'root' })
            export class WidgetService {}
            ",
        );
        assert!(classes.is_empty());
    }

    #[test]
    fn test_empty_selector_is_not_indexable() {
        let classes = extract(
            r"
            @Component({ selector: '' })
            export class EmptyComponent {}
            ",
        );
        assert!(classes.is_empty());
    }

    #[test]
    fn test_string_keys_are_accepted() {
        let classes = extract(
            r#"
            @Component({ 'selector': 'app-quoted' })
            export class QuotedComponent {}
            "#,
        );
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].selector, "app-quoted");
    }
}

//! Compiled-metadata extraction from library declaration files.
//!
//! Compiled libraries ship `.d.ts` files whose classes carry static fields
//! encoding the entity's selector, standalone flag, and module export list
//! as positional type arguments (`ɵcmp`, `ɵdir`, `ɵpipe`, `ɵmod`). These
//! positions are part of the framework's stable compiled-metadata shape:
//! for components and directives the selector is argument 2 and standalone
//! argument 8; for pipes the name is argument 2 and standalone argument 3;
//! for modules the export list is argument 4.
//!
//! Extraction here is a manual node walk rather than a query because the
//! static-field types nest irregularly across emitter versions.

use ngsi_core::ElementKind;
use tree_sitter::{Node, Tree};

/// One entity recovered from compiled metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredEntity {
    /// The declared class identifier.
    pub class_name: String,

    /// The entity kind, derived from which metadata field was present.
    pub kind: ElementKind,

    /// The raw selector (or pipe name) from the metadata's type arguments.
    pub selector: String,

    /// Whether the metadata marks the entity standalone.
    pub standalone: bool,
}

/// One module declaration and the entity names it exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredModule {
    /// The module class identifier.
    pub class_name: String,

    /// Class names listed in the module's export position.
    pub exports: Vec<String>,
}

/// Everything recovered from one declaration unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationUnit {
    /// Entities carrying component, directive, or pipe metadata.
    pub entities: Vec<DeclaredEntity>,

    /// Module declarations with their export lists.
    pub modules: Vec<DeclaredModule>,

    /// Source specifiers of `export ... from '...'` statements, quotes
    /// stripped. Relative specifiers point at sibling declaration files
    /// that are part of the same entry point's public surface.
    pub reexports: Vec<String>,
}

/// Positional argument of the selector in component/directive metadata.
const SELECTOR_ARG: usize = 1;
/// Positional argument of the standalone flag in component/directive metadata.
const STANDALONE_ARG: usize = 7;
/// Positional argument of the pipe name in pipe metadata.
const PIPE_NAME_ARG: usize = 1;
/// Positional argument of the standalone flag in pipe metadata.
const PIPE_STANDALONE_ARG: usize = 2;
/// Positional argument of the export list in module metadata.
const MODULE_EXPORTS_ARG: usize = 3;

/// Extracts entities, modules, and re-export sources from a parsed
/// declaration unit.
///
/// Collects every class declaration reachable in the unit, whether exported
/// directly or part of the library's internal module graph. Classes without
/// recognized metadata fields are ignored.
///
/// # Examples
///
/// ```
/// use ngsi_core::ElementKind;
/// use ngsi_ts_parser::{TsParser, extract_declarations};
///
/// let source = r#"
///     export declare class FooComponent {
///         static ɵcmp: i0.ɵɵComponentDeclaration<FooComponent, "lib-foo", never, {}, {}, never, never, true, never>;
///     }
/// "#;
/// let mut parser = TsParser::new()?;
/// let tree = parser.parse(source)?;
///
/// let unit = extract_declarations(&tree, source);
/// assert_eq!(unit.entities.len(), 1);
/// assert_eq!(unit.entities[0].kind, ElementKind::Component);
/// assert_eq!(unit.entities[0].selector, "lib-foo");
/// assert!(unit.entities[0].standalone);
/// # Ok::<(), ngsi_ts_parser::ParseError>(())
/// ```
#[must_use]
pub fn extract_declarations(tree: &Tree, source: &str) -> DeclarationUnit {
    let source_bytes = source.as_bytes();
    let root = tree.root_node();

    let mut unit = DeclarationUnit::default();

    let mut classes = Vec::new();
    collect_class_declarations(root, &mut classes);

    for class in classes {
        let Some(class_name) = class
            .child_by_field_name("name")
            .and_then(|n| node_text(n, source_bytes))
        else {
            continue;
        };

        let Some(body) = class.child_by_field_name("body") else {
            continue;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if !matches!(member.kind(), "public_field_definition" | "property_signature") {
                continue;
            }
            let Some(field_name) = member
                .child_by_field_name("name")
                .and_then(|n| node_text(n, source_bytes))
            else {
                continue;
            };
            let Some(args) = type_argument_nodes(member) else {
                continue;
            };

            match field_name {
                "ɵcmp" => {
                    if let Some(entity) = build_entity(
                        class_name,
                        ElementKind::Component,
                        &args,
                        SELECTOR_ARG,
                        Some(STANDALONE_ARG),
                        source_bytes,
                    ) {
                        unit.entities.push(entity);
                    }
                }
                "ɵdir" => {
                    if let Some(entity) = build_entity(
                        class_name,
                        ElementKind::Directive,
                        &args,
                        SELECTOR_ARG,
                        Some(STANDALONE_ARG),
                        source_bytes,
                    ) {
                        unit.entities.push(entity);
                    }
                }
                "ɵpipe" => {
                    if let Some(entity) = build_entity(
                        class_name,
                        ElementKind::Pipe,
                        &args,
                        PIPE_NAME_ARG,
                        Some(PIPE_STANDALONE_ARG),
                        source_bytes,
                    ) {
                        unit.entities.push(entity);
                    }
                }
                "ɵmod" => {
                    unit.modules.push(DeclaredModule {
                        class_name: class_name.to_owned(),
                        exports: exported_class_names(
                            args.get(MODULE_EXPORTS_ARG).copied(),
                            source_bytes,
                        ),
                    });
                }
                _ => {}
            }
        }
    }

    unit.reexports = collect_reexport_sources(root, source_bytes);
    unit
}

/// Recursively collects every `class_declaration` node in the unit.
///
/// Declaration files wrap classes in ambient (`declare`) and export
/// statements at varying depths, so a full walk is simpler than enumerating
/// the wrapper shapes.
fn collect_class_declarations<'tree>(node: Node<'tree>, out: &mut Vec<Node<'tree>>) {
    if node.kind() == "class_declaration" {
        out.push(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_class_declarations(child, out);
    }
}

/// Returns the positional type-argument nodes of a metadata field's type.
fn type_argument_nodes(member: Node<'_>) -> Option<Vec<Node<'_>>> {
    let type_annotation = member.child_by_field_name("type")?;
    let generic = find_descendant(type_annotation, "generic_type")?;
    let type_arguments = generic.child_by_field_name("type_arguments")?;

    let mut cursor = type_arguments.walk();
    Some(type_arguments.named_children(&mut cursor).collect())
}

/// Depth-first search for the first descendant of `kind`.
fn find_descendant<'tree>(node: Node<'tree>, kind: &str) -> Option<Node<'tree>> {
    if node.kind() == kind {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if let Some(found) = find_descendant(child, kind) {
            return Some(found);
        }
    }
    None
}

fn build_entity(
    class_name: &str,
    kind: ElementKind,
    args: &[Node<'_>],
    selector_arg: usize,
    standalone_arg: Option<usize>,
    source: &[u8],
) -> Option<DeclaredEntity> {
    let selector = args
        .get(selector_arg)
        .and_then(|n| node_text(*n, source))
        .map(strip_quotes)
        .filter(|s| !s.is_empty() && *s != "never")?;

    let standalone = standalone_arg
        .and_then(|idx| args.get(idx))
        .and_then(|n| node_text(*n, source))
        .is_some_and(|t| t == "true");

    Some(DeclaredEntity {
        class_name: class_name.to_owned(),
        kind,
        selector: selector.to_owned(),
        standalone,
    })
}

/// Resolves a module metadata export-list argument to plain class names.
///
/// The list is a tuple of `typeof X` entries where `X` may be qualified
/// (`i1.FooComponent`); only the final segment is the class name.
fn exported_class_names(arg: Option<Node<'_>>, source: &[u8]) -> Vec<String> {
    let Some(tuple) = arg.filter(|n| n.kind() == "tuple_type") else {
        return Vec::new();
    };

    let mut names = Vec::new();
    let mut cursor = tuple.walk();
    for entry in tuple.named_children(&mut cursor) {
        let Some(text) = node_text(entry, source) else {
            continue;
        };
        let reference = text.trim_start_matches("typeof").trim();
        let class_name = reference.rsplit('.').next().unwrap_or(reference);
        if !class_name.is_empty() {
            names.push(class_name.to_owned());
        }
    }
    names
}

/// Collects the source specifiers of top-level re-export statements.
fn collect_reexport_sources(root: Node<'_>, source: &[u8]) -> Vec<String> {
    let mut sources = Vec::new();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        if child.kind() != "export_statement" {
            continue;
        }
        if let Some(text) = child
            .child_by_field_name("source")
            .and_then(|n| node_text(n, source))
        {
            sources.push(strip_quotes(text).to_owned());
        }
    }
    sources
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

    fn extract(source: &str) -> DeclarationUnit {
        let mut parser = TsParser::new().expect("Parser creation failed");
        let tree = parser.parse(source).expect("Parse failed");
        extract_declarations(&tree, source)
    }

    #[test]
    fn test_component_metadata() {
        let unit = extract(
            r#"
            export declare class CardComponent {
                static ɵfac: i0.ɵɵFactoryDeclaration<CardComponent, never>;
                static ɵcmp: i0.ɵɵComponentDeclaration<CardComponent, "ui-card", never, {}, {}, never, never, false, never>;
            }
            "#,
        );
        assert_eq!(unit.entities.len(), 1);
        let entity = &unit.entities[0];
        assert_eq!(entity.class_name, "CardComponent");
        assert_eq!(entity.kind, ElementKind::Component);
        assert_eq!(entity.selector, "ui-card");
        assert!(!entity.standalone);
    }

    #[test]
    fn test_standalone_directive_metadata() {
        let unit = extract(
            r#"
            export declare class TooltipDirective {
                static ɵdir: i0.ɵɵDirectiveDeclaration<TooltipDirective, "[uiTooltip]", never, {}, {}, never, never, true, never>;
            }
            "#,
        );
        assert_eq!(unit.entities.len(), 1);
        let entity = &unit.entities[0];
        assert_eq!(entity.kind, ElementKind::Directive);
        assert_eq!(entity.selector, "[uiTooltip]");
        assert!(entity.standalone);
    }

    #[test]
    fn test_pipe_metadata_positions() {
        let unit = extract(
            r#"
            export declare class CurrencyPipe {
                static ɵpipe: i0.ɵɵPipeDeclaration<CurrencyPipe, "currency", true>;
            }
            "#,
        );
        assert_eq!(unit.entities.len(), 1);
        let entity = &unit.entities[0];
        assert_eq!(entity.kind, ElementKind::Pipe);
        assert_eq!(entity.selector, "currency");
        assert!(entity.standalone);
    }

    #[test]
    fn test_module_exports() {
        let unit = extract(
            r"
            export declare class CardModule {
                static ɵmod: i0.ɵɵNgModuleDeclaration<CardModule, [typeof i1.CardComponent, typeof i2.CardHeaderComponent], [typeof i3.CommonModule], [typeof i1.CardComponent]>;
            }
            ",
        );
        assert!(unit.entities.is_empty());
        assert_eq!(unit.modules.len(), 1);
        let module = &unit.modules[0];
        assert_eq!(module.class_name, "CardModule");
        assert_eq!(module.exports, vec!["CardComponent"]);
    }

    #[test]
    fn test_module_with_never_exports() {
        let unit = extract(
            r"
            export declare class EmptyModule {
                static ɵmod: i0.ɵɵNgModuleDeclaration<EmptyModule, never, never, never>;
            }
            ",
        );
        assert_eq!(unit.modules.len(), 1);
        assert!(unit.modules[0].exports.is_empty());
    }

    #[test]
    fn test_reexport_sources() {
        let unit = extract(
            r#"
            export * from './card.component';
            export { Tooltip } from "./tooltip.directive";
            export declare const VERSION: string;
            "#,
        );
        assert_eq!(unit.reexports, vec!["./card.component", "./tooltip.directive"]);
    }

    #[test]
    fn test_class_without_metadata_is_ignored() {
        let unit = extract(
            r"
            export declare class PlainService {
                doWork(): void;
            }
            ",
        );
        assert!(unit.entities.is_empty());
        assert!(unit.modules.is_empty());
    }

    #[test]
    fn test_multiple_entities_in_one_unit() {
        let unit = extract(
            r#"
            export declare class AComponent {
                static ɵcmp: i0.ɵɵComponentDeclaration<AComponent, "lib-a", never, {}, {}, never, never, true, never>;
            }
            export declare class BDirective {
                static ɵdir: i0.ɵɵDirectiveDeclaration<BDirective, "[libB]", never, {}, {}, never, never, false, never>;
            }
            "#,
        );
        assert_eq!(unit.entities.len(), 2);
    }

    #[test]
    fn test_missing_standalone_argument_defaults_false() {
        // Older emissions carry fewer positional arguments
        let unit = extract(
            r#"
            export declare class LegacyComponent {
                static ɵcmp: i0.ɵɵComponentDeclaration<LegacyComponent, "lib-legacy", never, {}, {}, never, never>;
            }
            "#,
        );
        assert_eq!(unit.entities.len(), 1);
        assert!(!unit.entities[0].standalone);
    }
}

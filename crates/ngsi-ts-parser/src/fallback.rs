//! Regex-based fallback extraction.
//!
//! When structural parsing is unavailable, fails, or yields nothing, a
//! line-oriented fallback infers the entity kind from the filename suffix
//! and scrapes the first `selector:`/`name:` string literal and the first
//! `export class` identifier. The fallback is best-effort: it yields at
//! most one entity per file and can never detect `standalone`, so it always
//! reports `false`.

use std::sync::OnceLock;

use ngsi_core::ElementKind;
use regex::Regex;

use crate::annotations::AnnotatedClass;

static SELECTOR_RE: OnceLock<Regex> = OnceLock::new();
static NAME_RE: OnceLock<Regex> = OnceLock::new();
static EXPORT_CLASS_RE: OnceLock<Regex> = OnceLock::new();

// The patterns are literals; a compile failure is a build defect, not input
#[allow(clippy::unwrap_used)]
fn selector_re() -> &'static Regex {
    SELECTOR_RE
        .get_or_init(|| Regex::new(r#"selector\s*:\s*['"`]([^'"`]+)['"`]"#).unwrap())
}

#[allow(clippy::unwrap_used)]
fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| Regex::new(r#"name\s*:\s*['"`]([^'"`]+)['"`]"#).unwrap())
}

#[allow(clippy::unwrap_used)]
fn export_class_re() -> &'static Regex {
    EXPORT_CLASS_RE.get_or_init(|| {
        Regex::new(r"export\s+(?:abstract\s+)?class\s+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap()
    })
}

/// Infers the entity kind from a filename's kind token.
///
/// Matching is case-insensitive on the `.component.` / `.directive.` /
/// `.pipe.` filename segment.
///
/// # Examples
///
/// ```
/// use ngsi_core::ElementKind;
/// use ngsi_ts_parser::kind_from_file_name;
///
/// assert_eq!(kind_from_file_name("widget.component.ts"), Some(ElementKind::Component));
/// assert_eq!(kind_from_file_name("Highlight.Directive.ts"), Some(ElementKind::Directive));
/// assert_eq!(kind_from_file_name("widget.service.ts"), None);
/// ```
#[must_use]
pub fn kind_from_file_name(file_name: &str) -> Option<ElementKind> {
    let lower = file_name.to_lowercase();
    if lower.contains(".component.") {
        Some(ElementKind::Component)
    } else if lower.contains(".directive.") {
        Some(ElementKind::Directive)
    } else if lower.contains(".pipe.") {
        Some(ElementKind::Pipe)
    } else {
        None
    }
}

/// Scrapes at most one entity from `source` without parsing it.
///
/// Returns `None` unless the filename names a kind, the source declares a
/// matching `selector:` (or `name:` for pipes) string literal, and an
/// `export class` identifier is present.
///
/// # Examples
///
/// ```
/// use ngsi_ts_parser::extract_with_fallback;
///
/// let source = r"
///     @Component({ selector: 'app-widget' })
///     export class WidgetComponent {}
/// ";
/// let entity = extract_with_fallback("widget.component.ts", source).unwrap();
/// assert_eq!(entity.class_name, "WidgetComponent");
/// assert_eq!(entity.selector, "app-widget");
/// assert!(!entity.standalone);
/// ```
#[must_use]
pub fn extract_with_fallback(file_name: &str, source: &str) -> Option<AnnotatedClass> {
    let kind = kind_from_file_name(file_name)?;

    let selector = match kind {
        ElementKind::Pipe => name_re().captures(source),
        _ => selector_re().captures(source),
    }
    .and_then(|c| c.get(1))
    .map(|m| m.as_str().to_owned())
    .filter(|s| !s.trim().is_empty())?;

    let class_name = export_class_re()
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned())?;

    Some(AnnotatedClass {
        class_name,
        kind,
        selector,
        standalone: false,
    })
}

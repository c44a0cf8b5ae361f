//! Selector grammar parsing.
//!
//! Raw selectors are CSS-like and may be comma-separated lists, attribute
//! forms, class forms, or compounds (`custom-input:not([disabled])`). The
//! trie indexes normalized variants of these, derived per comma-separated
//! segment:
//!
//! - `[x]` emits both `[x]` and bare `x`
//! - `.x` emits both `.x` and bare `x`
//! - `tag[attr]` emits the full compound, the bare `tag`, each bracketed
//!   attribute substring, and the bare attribute name when value-less
//! - anything else emits as-is
//!
//! Over-generation is deliberate: any variant may be what a template author
//! types, and collisions are disambiguated at lookup time by the trie.

use smallvec::SmallVec;

use crate::hash::FxHashSet;

/// Parses a raw selector string into its deduplicated indexable variants.
///
/// Pure and total: never fails, returns an empty set for empty or
/// whitespace-only input. Variant order follows discovery order over the
/// comma-separated segments.
///
/// # Examples
///
/// ```
/// use ngsi_core::selector_variants;
///
/// let variants = selector_variants("a[fooBar],button[fooBar]");
/// assert!(variants.iter().any(|v| v == "a[fooBar]"));
/// assert!(variants.iter().any(|v| v == "fooBar"));
/// assert!(variants.iter().any(|v| v == "button"));
///
/// assert_eq!(selector_variants("app-widget").as_slice(), ["app-widget"]);
/// assert!(selector_variants("  ").is_empty());
/// ```
#[must_use]
pub fn selector_variants(raw: &str) -> SmallVec<[String; 4]> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut variants: SmallVec<[String; 4]> = SmallVec::new();

    let mut push = |candidate: &str| {
        let candidate = candidate.trim();
        if !candidate.is_empty() && seen.insert(candidate.to_owned()) {
            variants.push(candidate.to_owned());
        }
    };

    for segment in raw.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        if let Some(class_name) = segment.strip_prefix('.') {
            push(segment);
            push(class_name);
            continue;
        }

        if !segment.contains('[') {
            push(segment);
            continue;
        }

        push(segment);

        // Bare element name: everything before the first attribute, class,
        // or pseudo-selector marker.
        let tag_end = segment
            .find(['[', ':', '.'])
            .unwrap_or(segment.len());
        push(&segment[..tag_end]);

        for attribute in bracketed_substrings(segment) {
            push(attribute);
            let inner = &attribute[1..attribute.len() - 1];
            if !inner.contains('=') {
                push(inner);
            }
        }
    }

    variants
}

/// Yields every `[...]` substring of `segment`, outermost brackets included.
fn bracketed_substrings(segment: &str) -> impl Iterator<Item = &str> {
    let bytes = segment.as_bytes();
    let mut position = 0;
    std::iter::from_fn(move || {
        while position < bytes.len() {
            if bytes[position] == b'[' {
                let start = position;
                let close = bytes[start..].iter().position(|&b| b == b']')?;
                position = start + close + 1;
                return Some(&segment[start..position]);
            }
            position += 1;
        }
        None
    })
}

//! The selector-keyed prefix index.
//!
//! [`SelectorTrie`] maps normalized selector variants to the
//! [`ElementRecord`]s that declare them. Keys are walked code point by code
//! point; a terminal node holds every record inserted under that exact
//! selector, so colliding selectors across entities are tolerated and
//! disambiguated at lookup time.
//!
//! # Arena layout
//!
//! Nodes live in a single owned `Vec` and address each other through
//! [`NodeId`] handles. Removal and insertion therefore never alias into the
//! same tree through pointers; every walk is an index lookup into the arena.

use crate::hash::FxHashMap;
use crate::types::{ElementRecord, SelectorEntry};

/// A stable handle to a node in the trie's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(u32);

impl NodeId {
    const ROOT: Self = Self(0);

    /// `None` when the arena index no longer fits the id width.
    #[inline]
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    children: FxHashMap<char, NodeId>,
    records: Vec<ElementRecord>,
}

/// A prefix tree over normalized selectors.
///
/// Supports exact lookup with collision disambiguation, prefix search, and
/// file-scoped removal. All selector-keyed operations are O(selector
/// length); collection operations add O(subtree size).
///
/// # Examples
///
/// ```
/// use ngsi_core::{ElementKind, ElementRecord, SelectorTrie};
///
/// let mut trie = SelectorTrie::new();
/// let record = ElementRecord::new(
///     ElementKind::Component,
///     "WidgetComponent",
///     "src/app/widget.component",
///     "app-widget",
///     "src/app/widget.component.ts",
/// );
/// trie.insert("app-widget", record.clone());
///
/// assert_eq!(trie.find("app-widget"), Some(record));
/// assert_eq!(trie.find("app-unknown"), None);
/// ```
#[derive(Debug)]
pub struct SelectorTrie {
    nodes: Vec<TrieNode>,
}

impl Default for SelectorTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectorTrie {
    /// Creates an empty trie containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
        }
    }

    /// Inserts `record` at the terminal node for `selector`.
    ///
    /// Idempotent per `(display_name, import_source)`: re-inserting a record
    /// with the same identity at the same selector leaves exactly one copy.
    /// An insert that would exhaust the arena's `u32` id space is dropped
    /// rather than aliased onto an unrelated node.
    pub fn insert(&mut self, selector: &str, record: ElementRecord) {
        let mut node = NodeId::ROOT;
        for ch in selector.chars() {
            let Some(next) = self.child_or_create(node, ch) else {
                return;
            };
            node = next;
        }

        let records = &mut self.nodes[node.index()].records;
        if let Some(existing) = records
            .iter_mut()
            .find(|r| r.identity() == record.identity())
        {
            *existing = record;
        } else {
            records.push(record);
        }
    }

    /// Exact lookup with collision disambiguation.
    ///
    /// Returns `None` when the selector path does not exist or its terminal
    /// holds no records. When several records collide, the winner is chosen
    /// by: (1) records whose raw selector lists `selector` verbatim beat
    /// those that matched only through a derived variant; (2) the remaining
    /// pool sorts by kind rank (components first), then shorter raw
    /// selector, then alphabetical display name.
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<ElementRecord> {
        let records = &self.nodes[self.walk(selector)?.index()].records;
        match records.len() {
            0 => None,
            1 => records.first().cloned(),
            _ => {
                let verbatim: Vec<&ElementRecord> = records
                    .iter()
                    .filter(|r| r.declares_selector(selector))
                    .collect();
                let pool: Vec<&ElementRecord> = if verbatim.is_empty() {
                    records.iter().collect()
                } else {
                    verbatim
                };
                pool.into_iter()
                    .min_by_key(|r| {
                        (
                            r.kind.rank(),
                            r.original_selector.len(),
                            r.display_name.clone(),
                        )
                    })
                    .cloned()
            }
        }
    }

    /// Returns every record stored at `selector`, unfiltered.
    ///
    /// The host's template selector matcher decides which candidate actually
    /// applies, so this surface never disambiguates.
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<ElementRecord> {
        self.walk(selector)
            .map(|node| self.nodes[node.index()].records.clone())
            .unwrap_or_default()
    }

    /// Collects every `(selector, record)` pair beneath `prefix`.
    ///
    /// Returns an empty list when the prefix path does not exist. The result
    /// is exhaustive and duplicate-free per pair; order is unspecified.
    #[must_use]
    pub fn search_with_selectors(&self, prefix: &str) -> Vec<SelectorEntry> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };

        let mut entries = Vec::new();
        let mut stack = vec![(start, prefix.to_owned())];
        while let Some((node, selector)) = stack.pop() {
            let node = &self.nodes[node.index()];
            for record in &node.records {
                entries.push(SelectorEntry {
                    selector: selector.clone(),
                    record: record.clone(),
                });
            }
            for (&ch, &child) in &node.children {
                let mut next = selector.clone();
                next.push(ch);
                stack.push((child, next));
            }
        }
        entries
    }

    /// Removes records at `selector` whose origin file is `origin_path`.
    ///
    /// No-op when the selector path does not exist. Paths compare after
    /// separator normalization, so Windows-style origins match their
    /// forward-slash equivalents. Records from other files at the same
    /// terminal are untouched.
    pub fn remove(&mut self, selector: &str, origin_path: &str) {
        let Some(node) = self.walk(selector) else {
            return;
        };
        let origin = normalize_separators(origin_path);
        self.nodes[node.index()]
            .records
            .retain(|r| normalize_separators(r.source_file.as_str()) != origin);
    }

    /// Returns every selector that has at least one record.
    #[must_use]
    pub fn all_selectors(&self) -> Vec<String> {
        self.search_with_selectors("")
            .into_iter()
            .map(|entry| entry.selector)
            .collect()
    }

    /// Returns every distinct record in the trie.
    ///
    /// A record inserted under several selector variants appears once,
    /// deduplicated by `(display_name, import_source)`.
    #[must_use]
    pub fn all_elements(&self) -> Vec<ElementRecord> {
        let mut seen: FxHashMap<(String, String), ()> = FxHashMap::default();
        let mut elements = Vec::new();
        for entry in self.search_with_selectors("") {
            let key = (
                entry.record.display_name.clone(),
                entry.record.import_source.clone(),
            );
            if seen.insert(key, ()).is_none() {
                elements.push(entry.record);
            }
        }
        elements
    }

    /// Resets the trie to a single empty root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(TrieNode::default());
    }

    /// Returns `true` if no selector holds any record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|n| n.records.is_empty())
    }

    /// Walks `selector` from the root, returning the terminal node if the
    /// full path exists.
    fn walk(&self, selector: &str) -> Option<NodeId> {
        let mut node = NodeId::ROOT;
        for ch in selector.chars() {
            node = *self.nodes[node.index()].children.get(&ch)?;
        }
        Some(node)
    }

    fn child_or_create(&mut self, parent: NodeId, ch: char) -> Option<NodeId> {
        if let Some(&child) = self.nodes[parent.index()].children.get(&ch) {
            return Some(child);
        }
        let child = NodeId::from_index(self.nodes.len())?;
        self.nodes.push(TrieNode::default());
        self.nodes[parent.index()].children.insert(ch, child);
        Some(child)
    }
}

fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    fn record(kind: ElementKind, name: &str, selector: &str, file: &str) -> ElementRecord {
        let mut r = ElementRecord::new(kind, name, format!("src/{name}"), selector, file);
        r.selectors = crate::selector::selector_variants(selector);
        r
    }

    #[test]
    fn test_insert_and_find() {
        let mut trie = SelectorTrie::new();
        let r = record(
            ElementKind::Component,
            "WidgetComponent",
            "app-widget",
            "src/widget.component.ts",
        );
        trie.insert("app-widget", r.clone());
        assert_eq!(trie.find("app-widget"), Some(r));
        assert_eq!(trie.find("app-widge"), None);
        assert_eq!(trie.find("app-widgets"), None);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut trie = SelectorTrie::new();
        let r = record(
            ElementKind::Component,
            "WidgetComponent",
            "app-widget",
            "src/widget.component.ts",
        );
        trie.insert("app-widget", r.clone());
        trie.insert("app-widget", r);
        assert_eq!(trie.find_all("app-widget").len(), 1);
    }

    #[test]
    fn test_reinsert_replaces_record_payload() {
        let mut trie = SelectorTrie::new();
        let mut r = record(
            ElementKind::Component,
            "WidgetComponent",
            "app-widget",
            "src/widget.component.ts",
        );
        trie.insert("app-widget", r.clone());
        r.is_standalone = true;
        trie.insert("app-widget", r);
        let found = trie.find("app-widget").unwrap();
        assert!(found.is_standalone);
    }

    #[test]
    fn test_disambiguation_prefers_components() {
        let mut trie = SelectorTrie::new();
        let pipe = record(ElementKind::Pipe, "HighlightPipe", "highlight", "src/a.pipe.ts");
        let directive = record(
            ElementKind::Directive,
            "HighlightDirective",
            "highlight",
            "src/b.directive.ts",
        );
        let component = record(
            ElementKind::Component,
            "HighlightComponent",
            "highlight",
            "src/c.component.ts",
        );

        // Insertion order must not matter
        trie.insert("highlight", pipe);
        trie.insert("highlight", component);
        trie.insert("highlight", directive);

        let found = trie.find("highlight").unwrap();
        assert_eq!(found.kind, ElementKind::Component);
    }

    #[test]
    fn test_disambiguation_prefers_verbatim_declarations() {
        let mut trie = SelectorTrie::new();
        // Declares `tuiButton` only as a derived variant of a[tuiButton]
        let derived = record(
            ElementKind::Component,
            "AButton",
            "a[tuiButton]",
            "src/a.component.ts",
        );
        // Declares `tuiButton` verbatim
        let verbatim = record(
            ElementKind::Directive,
            "TuiButton",
            "tuiButton",
            "src/b.directive.ts",
        );
        trie.insert("tuiButton", derived);
        trie.insert("tuiButton", verbatim);

        // The directive wins despite its lower kind rank because its raw
        // selector lists the query verbatim.
        let found = trie.find("tuiButton").unwrap();
        assert_eq!(found.display_name, "TuiButton");
    }

    #[test]
    fn test_disambiguation_shorter_selector_then_name() {
        let mut trie = SelectorTrie::new();
        let long = record(
            ElementKind::Directive,
            "ZDirective",
            "[x], [x2]",
            "src/z.directive.ts",
        );
        let short = record(ElementKind::Directive, "ADirective", "[x]", "src/a.directive.ts");
        trie.insert("x", long);
        trie.insert("x", short);
        let found = trie.find("x").unwrap();
        assert_eq!(found.display_name, "ADirective");
    }

    #[test]
    fn test_prefix_search_completeness() {
        let mut trie = SelectorTrie::new();
        for (name, selector) in [
            ("AppWidget", "app-widget"),
            ("AppWindow", "app-window"),
            ("AppTable", "app-table"),
        ] {
            trie.insert(
                selector,
                record(ElementKind::Component, name, selector, "src/app.ts"),
            );
        }

        let hits = trie.search_with_selectors("app-wi");
        let selectors: Vec<&str> = hits.iter().map(|e| e.selector.as_str()).collect();
        assert_eq!(hits.len(), 2);
        assert!(selectors.contains(&"app-widget"));
        assert!(selectors.contains(&"app-window"));

        assert!(trie.search_with_selectors("zzz").is_empty());
    }

    #[test]
    fn test_prefix_search_includes_intermediate_terminals() {
        let mut trie = SelectorTrie::new();
        trie.insert(
            "app",
            record(ElementKind::Component, "App", "app", "src/app.ts"),
        );
        trie.insert(
            "app-widget",
            record(ElementKind::Component, "Widget", "app-widget", "src/w.ts"),
        );

        let hits = trie.search_with_selectors("app");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_removal_is_file_scoped() {
        let mut trie = SelectorTrie::new();
        trie.insert(
            "highlight",
            record(
                ElementKind::Directive,
                "OldHighlight",
                "highlight",
                "/project/src/old.directive.ts",
            ),
        );
        trie.insert(
            "highlight",
            record(
                ElementKind::Directive,
                "NewHighlight",
                "highlight",
                "/project/src/new.directive.ts",
            ),
        );

        trie.remove("highlight", "/project/src/old.directive.ts");

        let remaining = trie.find_all("highlight");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].display_name, "NewHighlight");
    }

    #[test]
    fn test_removal_normalizes_separators() {
        let mut trie = SelectorTrie::new();
        trie.insert(
            "app-widget",
            record(
                ElementKind::Component,
                "Widget",
                "app-widget",
                "C:/project/src/widget.component.ts",
            ),
        );
        trie.remove("app-widget", "C:\\project\\src\\widget.component.ts");
        assert!(trie.find("app-widget").is_none());
    }

    #[test]
    fn test_remove_missing_path_is_noop() {
        let mut trie = SelectorTrie::new();
        trie.remove("never-inserted", "/anywhere.ts");
        assert!(trie.is_empty());
    }

    #[test]
    fn test_all_elements_dedupes_variants() {
        let mut trie = SelectorTrie::new();
        let r = record(
            ElementKind::Directive,
            "FooDirective",
            "[appFoo]",
            "src/foo.directive.ts",
        );
        let variants = r.selectors.clone();
        for variant in &variants {
            trie.insert(variant, r.clone());
        }
        assert_eq!(trie.all_selectors().len(), 2);
        assert_eq!(trie.all_elements().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut trie = SelectorTrie::new();
        trie.insert(
            "app-widget",
            record(ElementKind::Component, "Widget", "app-widget", "src/w.ts"),
        );
        assert!(!trie.is_empty());
        trie.clear();
        assert!(trie.is_empty());
        assert!(trie.find("app-widget").is_none());
    }

    #[test]
    fn test_node_id_space_is_bounded() {
        // An index past the id width yields no handle instead of wrapping
        // onto an existing node.
        assert!(NodeId::from_index(u32::MAX as usize).is_some());
        assert!(NodeId::from_index(u32::MAX as usize + 1).is_none());
    }

    #[test]
    fn test_unicode_selectors() {
        let mut trie = SelectorTrie::new();
        trie.insert(
            "app-über",
            record(ElementKind::Component, "Uber", "app-über", "src/u.ts"),
        );
        assert!(trie.find("app-über").is_some());
        assert_eq!(trie.search_with_selectors("app-ü").len(), 1);
    }
}

//! Path-alias trie and import resolution.
//!
//! Projects map import aliases to filesystem targets (`@app/* →
//! src/app/*`). The [`AliasTrie`] indexes the cleaned targets by
//! lower-cased path segment; [`AliasResolver::resolve_import_path`] walks
//! it for the deepest matching alias and falls back to a relative path
//! when nothing matches. An alias is always preferred over a relative
//! path, even a longer one.
//!
//! Matching is case-insensitive but the unmatched suffix of a wildcard
//! alias keeps its original casing. When an alias was declared with
//! different casing than the physical directory the resolved import can
//! disagree with the filesystem on case-sensitive systems; that ambiguity
//! comes with the mapping format itself.

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::paths::{project_anchor, relative_import, strip_source_extension};

/// The merged path-mapping configuration for one project.
///
/// Produced by an external configuration loader that handles file
/// discovery and `extends` merging; only the final pair arrives here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathMappings {
    /// Directory that relative mapping targets resolve against.
    pub base_url: Utf8PathBuf,

    /// Alias patterns mapped to their target path arrays.
    #[serde(default)]
    pub paths: FxHashMap<String, Vec<String>>,
}

/// Handle into the alias trie's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    const ROOT: Self = Self(0);

    /// `None` when the arena index no longer fits the id width.
    #[inline]
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct AliasNode {
    children: FxHashMap<String, NodeId>,
    /// Cleaned alias stored at the terminal node of a mapping's target.
    alias: Option<String>,
    /// Barrel mappings resolve to one fixed entry point with no suffix.
    is_barrel: bool,
}

/// A prefix tree over lower-cased path segments of alias targets.
#[derive(Debug)]
pub struct AliasTrie {
    nodes: Vec<AliasNode>,
}

impl AliasTrie {
    /// Creates an empty trie containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![AliasNode::default()],
        }
    }

    /// Builds a trie from a project's path mappings.
    ///
    /// Only the first target of each mapping is used. Targets resolve
    /// against `base_url` and are stored relative to the project anchor,
    /// the nearest ancestor of `base_url` carrying a `package.json` or a
    /// `src` directory.
    #[must_use]
    pub fn build(mappings: &PathMappings) -> Self {
        let mut trie = Self::new();
        let anchor = project_anchor(&mappings.base_url);

        for (alias, targets) in &mappings.paths {
            let Some(target) = targets.first() else {
                continue;
            };
            trie.insert_mapping(alias, target, &mappings.base_url, &anchor);
        }

        debug!(
            mappings = mappings.paths.len(),
            nodes = trie.nodes.len(),
            "alias trie built"
        );
        trie
    }

    fn insert_mapping(&mut self, alias: &str, target: &str, base_url: &Utf8Path, anchor: &Utf8Path) {
        let is_wildcard = alias.ends_with('*');
        let cleaned_alias = alias.trim_end_matches('*').trim_end_matches('/');

        let cleaned_target = if is_wildcard {
            target.trim_end_matches('*').trim_end_matches('/')
        } else {
            target
        };
        let mut absolute = base_url.join(cleaned_target.trim_start_matches("./"));
        if !is_wildcard {
            absolute = barrel_directory(&absolute);
        }

        let relative = absolute.strip_prefix(anchor).unwrap_or(&absolute);

        let mut node = NodeId::ROOT;
        for segment in relative.components() {
            let Some(next) = self.child_or_create(node, segment.as_str().to_lowercase()) else {
                warn!(alias, "alias trie id space exhausted; mapping dropped");
                return;
            };
            node = next;
        }
        let terminal = &mut self.nodes[node.index()];
        terminal.alias = Some(cleaned_alias.to_owned());
        terminal.is_barrel = !is_wildcard;
    }

    /// Resolves `target` to the deepest matching alias import path.
    ///
    /// Segments match case-insensitively. A barrel alias only matches the
    /// whole path (it names one fixed entry point); a wildcard alias
    /// matches any prefix and the remaining segments are appended with
    /// their original casing. Returns `None` when no alias covers the
    /// path.
    #[must_use]
    pub fn find_longest_prefix_match(
        &self,
        target: &Utf8Path,
        project_root: &Utf8Path,
    ) -> Option<String> {
        let relative = target.strip_prefix(project_root).unwrap_or(target);
        let normalized = relative.as_str().replace('\\', "/");
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let mut node = NodeId::ROOT;
        let mut best: Option<(&str, bool, usize)> = None;

        for (position, segment) in segments.iter().enumerate() {
            let lowered = segment.to_lowercase();
            let Some(&child) = self.nodes[node.index()].children.get(&lowered) else {
                break;
            };
            node = child;

            let depth = position + 1;
            let matched = &self.nodes[node.index()];
            if let Some(alias) = &matched.alias {
                // A barrel names one entry point exactly; with segments
                // left over only a wildcard can absorb the suffix.
                if !matched.is_barrel || depth == segments.len() {
                    best = Some((alias.as_str(), matched.is_barrel, depth));
                }
            }
        }

        let (alias, is_barrel, depth) = best?;
        if is_barrel || depth == segments.len() {
            return Some(alias.to_owned());
        }
        Some(format!("{alias}/{}", segments[depth..].join("/")))
    }

    /// Returns `true` if no mapping was inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn child_or_create(&mut self, node: NodeId, segment: String) -> Option<NodeId> {
        if let Some(&existing) = self.nodes[node.index()].children.get(&segment) {
            return Some(existing);
        }
        let id = NodeId::from_index(self.nodes.len())?;
        self.nodes.push(AliasNode::default());
        self.nodes[node.index()].children.insert(segment, id);
        Some(id)
    }
}

impl Default for AliasTrie {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduces a barrel mapping target to the directory or extensionless file
/// it stands for.
fn barrel_directory(target: &Utf8Path) -> Utf8PathBuf {
    let is_index_file = target
        .file_name()
        .is_some_and(|name| name.to_lowercase().starts_with("index."));
    if is_index_file {
        if let Some(parent) = target.parent() {
            return parent.to_owned();
        }
    }
    target.with_extension("")
}

/// Resolves import paths for one project, alias-first.
#[derive(Debug)]
pub struct AliasResolver {
    trie: AliasTrie,
}

impl AliasResolver {
    /// Builds a resolver from the project's merged path mappings.
    #[must_use]
    pub fn new(mappings: &PathMappings) -> Self {
        Self {
            trie: AliasTrie::build(mappings),
        }
    }

    /// Creates a resolver with no mappings; every path resolves relative.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            trie: AliasTrie::new(),
        }
    }

    /// Renders the import path for `target` as seen from `current_file`.
    ///
    /// Targets arrive extension-free; a trailing `.ts`/`.d.ts` is
    /// tolerated and stripped, while a dotted basename like
    /// `button.component` passes through intact. The deepest matching
    /// alias wins; only when no alias covers the target does the resolver
    /// fall back to a `./`-prefixed relative path with forward slashes.
    #[must_use]
    pub fn resolve_import_path(
        &self,
        target: &Utf8Path,
        current_file: &Utf8Path,
        project_root: &Utf8Path,
    ) -> String {
        let stripped = strip_source_extension(target);
        if let Some(alias) = self.trie.find_longest_prefix_match(&stripped, project_root) {
            return alias;
        }
        relative_import(current_file, target)
    }

    /// Returns `true` if the resolver carries no alias mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }
}

//! Indexed entity types.
//!
//! This module provides [`ElementKind`] and [`ElementRecord`], the unit of
//! index content. One record describes one component, directive, or pipe
//! discovered in project sources or in a library's declaration files.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The kind of an indexed entity.
///
/// # Examples
///
/// ```
/// use ngsi_core::ElementKind;
///
/// assert!(ElementKind::Component.rank() < ElementKind::Directive.rank());
/// assert!(ElementKind::Directive.rank() < ElementKind::Pipe.rank());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ElementKind {
    /// A component: a directive with a template, matched by a tag-like selector.
    #[default]
    Component,

    /// An attribute or structural directive.
    Directive,

    /// A value-transform pipe, identified by its invocation name.
    Pipe,
}

impl ElementKind {
    /// Returns the disambiguation rank for colliding selector lookups.
    ///
    /// Components win over directives, directives over pipes. Lower ranks
    /// sort first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::ElementKind;
    ///
    /// assert_eq!(ElementKind::Component.rank(), 0);
    /// assert_eq!(ElementKind::Pipe.rank(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Component => 0,
            Self::Directive => 1,
            Self::Pipe => 2,
        }
    }

    /// Returns a human-readable label for this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::ElementKind;
    ///
    /// assert_eq!(ElementKind::Component.label(), "Component");
    /// assert_eq!(ElementKind::Pipe.label(), "Pipe");
    /// ```
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Component => "Component",
            Self::Directive => "Directive",
            Self::Pipe => "Pipe",
        }
    }
}

/// One indexed component, directive, or pipe.
///
/// `ElementRecord` is an immutable value: the indexer never mutates a stored
/// record, it removes and re-inserts on change.
///
/// # Invariant
///
/// If `is_standalone` is `false`, consumers must import the entity through
/// [`exporting_module`](Self::exporting_module) rather than importing
/// [`display_name`](Self::display_name) directly.
///
/// # Examples
///
/// ```
/// use ngsi_core::{ElementKind, ElementRecord};
///
/// let record = ElementRecord::new(
///     ElementKind::Component,
///     "WidgetComponent",
///     "src/app/widget/widget.component",
///     "app-widget",
///     "src/app/widget/widget.component.ts",
/// );
///
/// assert_eq!(record.kind, ElementKind::Component);
/// assert!(!record.is_standalone);
/// assert!(record.selectors.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Module or file path to import the entity from.
    ///
    /// For project-local entities this is a path relative to the project
    /// root; for library entities it is an import specifier.
    pub import_source: String,

    /// The exported class name to import.
    pub display_name: String,

    /// What kind of entity this record describes.
    pub kind: ElementKind,

    /// The raw, unparsed selector string.
    ///
    /// Preserves compound forms, pseudo-selectors like `:not(...)`, and
    /// comma lists. Handed verbatim to the host's template selector matcher
    /// for precise re-matching.
    pub original_selector: String,

    /// Normalized indexable variants derived from `original_selector`.
    ///
    /// Uses `SmallVec<[String; 4]>` because most selectors produce four or
    /// fewer variants.
    pub selectors: SmallVec<[String; 4]>,

    /// Whether the entity can be imported directly.
    pub is_standalone: bool,

    /// The declaring module to import when `is_standalone` is `false`.
    pub exporting_module: Option<String>,

    /// Absolute path of the file this record was extracted from.
    ///
    /// Used to scope trie removals when the file changes or disappears.
    pub source_file: Utf8PathBuf,
}

impl ElementRecord {
    /// Creates a record with no selector variants, no module mapping, and
    /// `is_standalone = false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::{ElementKind, ElementRecord};
    ///
    /// let record = ElementRecord::new(
    ///     ElementKind::Pipe,
    ///     "CurrencyPipe",
    ///     "@ui/pipes",
    ///     "currency",
    ///     "/deps/ui/pipes/index.d.ts",
    /// );
    /// assert_eq!(record.display_name, "CurrencyPipe");
    /// ```
    #[must_use]
    pub fn new(
        kind: ElementKind,
        display_name: impl Into<String>,
        import_source: impl Into<String>,
        original_selector: impl Into<String>,
        source_file: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            import_source: import_source.into(),
            display_name: display_name.into(),
            kind,
            original_selector: original_selector.into(),
            selectors: SmallVec::new(),
            is_standalone: false,
            exporting_module: None,
            source_file: source_file.into(),
        }
    }

    /// Returns `true` if `selector` appears verbatim in the comma-separated
    /// segments of `original_selector`.
    ///
    /// This is the first disambiguation criterion for colliding lookups: a
    /// record whose raw selector literally lists the queried token beats one
    /// that only matched through a derived variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::{ElementKind, ElementRecord};
    ///
    /// let record = ElementRecord::new(
    ///     ElementKind::Directive,
    ///     "ButtonDirective",
    ///     "@ui/button",
    ///     "a[uiButton], button[uiButton]",
    ///     "/deps/ui/button/index.d.ts",
    /// );
    /// assert!(record.declares_selector("button[uiButton]"));
    /// assert!(!record.declares_selector("uiButton"));
    /// ```
    #[must_use]
    pub fn declares_selector(&self, selector: &str) -> bool {
        self.original_selector
            .split(',')
            .any(|segment| segment.trim() == selector)
    }

    /// Returns the import path consumers should use.
    ///
    /// Standalone entities import themselves; declared entities import their
    /// exporting module's name when one is known.
    ///
    /// # Examples
    ///
    /// ```
    /// use ngsi_core::{ElementKind, ElementRecord};
    ///
    /// let mut record = ElementRecord::new(
    ///     ElementKind::Component,
    ///     "CardComponent",
    ///     "@ui/card",
    ///     "ui-card",
    ///     "/deps/ui/card/index.d.ts",
    /// );
    /// record.exporting_module = Some("CardModule".to_owned());
    /// assert_eq!(record.importable_name(), "CardModule");
    ///
    /// record.is_standalone = true;
    /// assert_eq!(record.importable_name(), "CardComponent");
    /// ```
    #[must_use]
    pub fn importable_name(&self) -> &str {
        if self.is_standalone {
            &self.display_name
        } else {
            self.exporting_module
                .as_deref()
                .unwrap_or(&self.display_name)
        }
    }

    /// Returns the identity key used for idempotent trie inserts.
    #[inline]
    #[must_use]
    pub fn identity(&self) -> (&str, &str) {
        (&self.display_name, &self.import_source)
    }
}

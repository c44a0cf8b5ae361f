//! Library declaration-file indexing.
//!
//! Compiled dependencies expose entry points (`import specifier → .d.ts
//! path` pairs, resolved externally from the package manifest). The
//! [`LibraryIndexer`] walks each entry point's declaration unit plus the
//! relative re-exports reachable from it, recovers entity and module
//! metadata, and feeds the resulting records into the owning indexer's
//! selector trie under the library's import path.
//!
//! Component-to-module attribution uses a first-module-wins map: the first
//! module found exporting an entity name claims it, and later modules that
//! re-export the same name do not overwrite the mapping. This is a known
//! heuristic, not a guarantee of correctness when several modules
//! legitimately re-export one entity.

use camino::{Utf8Path, Utf8PathBuf};
use ngsi_core::{ElementRecord, FxHashMap, FxHashSet, selector_variants};
use ngsi_ts_parser::{DeclarationUnit, TsParser, extract_declarations};
use tracing::{debug, warn};

use crate::error::IndexError;
use crate::indexer::Indexer;

/// One publicly importable module of a compiled library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntryPoint {
    /// The import specifier consumers write (`@ui/card`).
    pub specifier: String,

    /// Absolute path of the entry point's declaration file.
    pub declaration_file: Utf8PathBuf,
}

impl LibraryEntryPoint {
    /// Creates an entry point pair.
    #[must_use]
    pub fn new(specifier: impl Into<String>, declaration_file: impl Into<Utf8PathBuf>) -> Self {
        Self {
            specifier: specifier.into(),
            declaration_file: declaration_file.into(),
        }
    }
}

/// A declaration unit attributed to its entry point and file.
struct CollectedUnit {
    specifier: String,
    file: Utf8PathBuf,
    unit: DeclarationUnit,
}

/// Indexes compiled library entry points into an [`Indexer`]'s trie.
pub struct LibraryIndexer<'idx> {
    indexer: &'idx Indexer,
    parser: TsParser,
}

impl<'idx> LibraryIndexer<'idx> {
    /// Creates a library indexer feeding `indexer`'s selector trie.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Parse`] if the TypeScript parser cannot be
    /// initialized.
    pub fn new(indexer: &'idx Indexer) -> Result<Self, IndexError> {
        let parser = TsParser::new()
            .map_err(|e| IndexError::parse(indexer.project_root().to_owned(), e))?;
        Ok(Self { indexer, parser })
    }

    /// Indexes every entry point of one library.
    ///
    /// A parse or read failure for one entry point is logged and skipped;
    /// it never aborts indexing of the remaining entry points. Returns the
    /// number of entity records inserted.
    pub fn index_entry_points(&mut self, entry_points: &[LibraryEntryPoint]) -> usize {
        let mut units = Vec::new();
        for entry_point in entry_points {
            self.collect_units(entry_point, &mut units);
        }

        // Module pass runs over every unit before any entity is built so
        // cross-file module exports attribute correctly.
        let export_map = build_export_map(&units);

        let mut inserted = 0;
        for collected in &units {
            for entity in &collected.unit.entities {
                let record = build_record(collected, entity, &export_map);
                self.indexer.insert_element(&record);
                inserted += 1;
            }
        }

        debug!(entities = inserted, "library entry points indexed");
        inserted
    }

    /// Parses an entry point's declaration file and every relative
    /// re-export reachable from it, with cycle protection.
    fn collect_units(&mut self, entry_point: &LibraryEntryPoint, units: &mut Vec<CollectedUnit>) {
        let mut visited: FxHashSet<Utf8PathBuf> = FxHashSet::default();
        let mut pending = vec![entry_point.declaration_file.clone()];

        while let Some(file) = pending.pop() {
            if !visited.insert(file.clone()) {
                continue;
            }

            let unit = match self.parse_declaration_file(&file) {
                Ok(unit) => unit,
                Err(e) => {
                    warn!(%file, error = %e, "skipping unreadable declaration file");
                    continue;
                }
            };

            for reexport in &unit.reexports {
                // Package specifiers are other entry points, indexed on
                // their own; only sibling files are followed here.
                if !reexport.starts_with('.') {
                    continue;
                }
                if let Some(target) = resolve_relative_declaration(&file, reexport) {
                    pending.push(target);
                }
            }

            units.push(CollectedUnit {
                specifier: entry_point.specifier.clone(),
                file,
                unit,
            });
        }
    }

    fn parse_declaration_file(&mut self, file: &Utf8Path) -> Result<DeclarationUnit, IndexError> {
        let source =
            std::fs::read_to_string(file).map_err(|e| IndexError::read(file.to_owned(), e))?;
        let tree = self
            .parser
            .parse(&source)
            .map_err(|e| IndexError::parse(file.to_owned(), e))?;
        Ok(extract_declarations(&tree, &source))
    }
}

/// Resolves a relative re-export specifier against its declaring file.
///
/// An extensionless specifier is taken as a sibling `<name>.d.ts` first.
/// When no such file exists but `<name>/index.d.ts` does, the specifier
/// names a directory barrel and the index declaration is used instead.
fn resolve_relative_declaration(from: &Utf8Path, specifier: &str) -> Option<Utf8PathBuf> {
    let parent = from.parent()?;
    let mut target = parent.to_owned();
    for segment in specifier.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                target = target.parent()?.to_owned();
            }
            other => target.push(other),
        }
    }
    if target.as_str().ends_with(".d.ts") {
        return Some(target);
    }
    let as_file = Utf8PathBuf::from(format!("{target}.d.ts"));
    if as_file.is_file() {
        return Some(as_file);
    }
    let as_index = target.join("index.d.ts");
    if as_index.is_file() {
        return Some(as_index);
    }
    Some(as_file)
}

/// First-module-wins map from entity name to `(module name, specifier)`.
fn build_export_map(units: &[CollectedUnit]) -> FxHashMap<String, (String, String)> {
    let mut export_map: FxHashMap<String, (String, String)> = FxHashMap::default();
    for collected in units {
        for module in &collected.unit.modules {
            for export in &module.exports {
                export_map
                    .entry(export.clone())
                    .or_insert_with(|| (module.class_name.clone(), collected.specifier.clone()));
            }
        }
    }
    export_map
}

/// Builds the index record for one declared entity.
///
/// Standalone entities import themselves from their own entry point.
/// Declared entities resolve through the module mapping when one exists;
/// with no module found, the entity's own specifier and name stand in,
/// which signals a data-quality gap in the library rather than a correct
/// resolution.
fn build_record(
    collected: &CollectedUnit,
    entity: &ngsi_ts_parser::DeclaredEntity,
    export_map: &FxHashMap<String, (String, String)>,
) -> ElementRecord {
    let (display_name, import_source, exporting_module) = if entity.standalone {
        (entity.class_name.clone(), collected.specifier.clone(), None)
    } else if let Some((module_name, specifier)) = export_map.get(&entity.class_name) {
        (
            module_name.clone(),
            specifier.clone(),
            Some(module_name.clone()),
        )
    } else {
        (entity.class_name.clone(), collected.specifier.clone(), None)
    };

    let mut record = ElementRecord::new(
        entity.kind,
        display_name,
        import_source,
        entity.selector.clone(),
        collected.file.clone(),
    );
    record.is_standalone = entity.standalone;
    record.exporting_module = exporting_module;
    record.selectors = selector_variants(&record.original_selector);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_declaration() {
        let from = Utf8Path::new("/deps/ui/card/index.d.ts");
        assert_eq!(
            resolve_relative_declaration(from, "./card.component"),
            Some(Utf8PathBuf::from("/deps/ui/card/card.component.d.ts"))
        );
        assert_eq!(
            resolve_relative_declaration(from, "../tooltip/tooltip.directive.d.ts"),
            Some(Utf8PathBuf::from("/deps/ui/tooltip/tooltip.directive.d.ts"))
        );
    }

    #[test]
    fn test_resolve_relative_declaration_directory_barrel() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
        std::fs::create_dir_all(root.join("components")).expect("create dirs");
        std::fs::write(root.join("components/index.d.ts"), "export {};").expect("write index");

        let from = root.join("index.d.ts");
        assert_eq!(
            resolve_relative_declaration(&from, "./components"),
            Some(root.join("components/index.d.ts"))
        );

        // A sibling file of the same name wins over the directory barrel.
        std::fs::write(root.join("components.d.ts"), "export {};").expect("write sibling");
        assert_eq!(
            resolve_relative_declaration(&from, "./components"),
            Some(root.join("components.d.ts"))
        );
    }

    #[test]
    fn test_export_map_first_module_wins() {
        use ngsi_ts_parser::{DeclarationUnit, DeclaredModule};

        let units = vec![
            CollectedUnit {
                specifier: "@ui/card".to_owned(),
                file: Utf8PathBuf::from("/deps/ui/card/index.d.ts"),
                unit: DeclarationUnit {
                    entities: Vec::new(),
                    modules: vec![DeclaredModule {
                        class_name: "CardModule".to_owned(),
                        exports: vec!["CardComponent".to_owned()],
                    }],
                    reexports: Vec::new(),
                },
            },
            CollectedUnit {
                specifier: "@ui/legacy".to_owned(),
                file: Utf8PathBuf::from("/deps/ui/legacy/index.d.ts"),
                unit: DeclarationUnit {
                    entities: Vec::new(),
                    modules: vec![DeclaredModule {
                        class_name: "LegacyModule".to_owned(),
                        exports: vec!["CardComponent".to_owned()],
                    }],
                    reexports: Vec::new(),
                },
            },
        ];

        let map = build_export_map(&units);
        assert_eq!(
            map.get("CardComponent"),
            Some(&("CardModule".to_owned(), "@ui/card".to_owned()))
        );
    }

    #[test]
    fn test_build_record_module_resolution() {
        use ngsi_core::ElementKind;
        use ngsi_ts_parser::DeclaredEntity;

        let collected = CollectedUnit {
            specifier: "@ui/card".to_owned(),
            file: Utf8PathBuf::from("/deps/ui/card/card.component.d.ts"),
            unit: DeclarationUnit::default(),
        };
        let entity = DeclaredEntity {
            class_name: "CardComponent".to_owned(),
            kind: ElementKind::Component,
            selector: "ui-card".to_owned(),
            standalone: false,
        };
        let mut export_map = FxHashMap::default();
        export_map.insert(
            "CardComponent".to_owned(),
            ("CardModule".to_owned(), "@ui/card".to_owned()),
        );

        let record = build_record(&collected, &entity, &export_map);
        assert_eq!(record.display_name, "CardModule");
        assert_eq!(record.import_source, "@ui/card");
        assert_eq!(record.exporting_module.as_deref(), Some("CardModule"));
        assert!(!record.is_standalone);
        assert!(record.selectors.iter().any(|s| s == "ui-card"));
    }

    #[test]
    fn test_build_record_standalone_uses_own_name() {
        use ngsi_core::ElementKind;
        use ngsi_ts_parser::DeclaredEntity;

        let collected = CollectedUnit {
            specifier: "@ui/tooltip".to_owned(),
            file: Utf8PathBuf::from("/deps/ui/tooltip/index.d.ts"),
            unit: DeclarationUnit::default(),
        };
        let entity = DeclaredEntity {
            class_name: "TooltipDirective".to_owned(),
            kind: ElementKind::Directive,
            selector: "[uiTooltip]".to_owned(),
            standalone: true,
        };

        let record = build_record(&collected, &entity, &FxHashMap::default());
        assert_eq!(record.display_name, "TooltipDirective");
        assert_eq!(record.import_source, "@ui/tooltip");
        assert!(record.exporting_module.is_none());
        assert!(record.is_standalone);
    }
}

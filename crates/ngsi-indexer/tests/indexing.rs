//! End-to-end indexing tests over real temporary project trees.

use camino::Utf8PathBuf;
use ngsi_core::{ElementKind, IndexConfig};
use ngsi_indexer::{Indexer, LibraryEntryPoint, LibraryIndexer};

fn temp_project() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 tempdir");
    (dir, root)
}

fn write_file(root: &Utf8PathBuf, relative: &str, contents: &str) -> Utf8PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, contents).expect("write file");
    path
}

fn make_indexer(root: &Utf8PathBuf) -> Indexer {
    Indexer::new(IndexConfig::for_root(root.clone())).expect("indexer")
}

#[test]
fn test_full_index_finds_component() {
    let (_dir, root) = temp_project();
    write_file(
        &root,
        "src/app/widget.component.ts",
        r"
            import { Component } from '@angular/core';

            @Component({
                selector: 'app-widget',
                standalone: true,
            })
            export class WidgetComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    let snapshot = indexer.full_index().expect("full index");

    assert_eq!(snapshot.files.len(), 1);
    let record = indexer.get_element("app-widget").expect("indexed record");
    assert_eq!(record.display_name, "WidgetComponent");
    assert_eq!(record.kind, ElementKind::Component);
    assert_eq!(record.import_source, "src/app/widget.component");
    assert!(record.is_standalone);

    let stats = indexer.stats();
    assert_eq!(stats.files_indexed, 1);
    assert_eq!(stats.entities_indexed, 1);
}

#[test]
fn test_full_index_skips_non_candidate_files() {
    let (_dir, root) = temp_project();
    write_file(
        &root,
        "src/app/widget.service.ts",
        r"
            @Component({ selector: 'app-hidden' })
            export class HiddenComponent {}
        ",
    );
    write_file(
        &root,
        "node_modules/lib/card.component.ts",
        r"
            @Component({ selector: 'lib-card' })
            export class CardComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    let snapshot = indexer.full_index().expect("full index");

    assert!(snapshot.is_empty());
    assert!(indexer.get_element("app-hidden").is_none());
    assert!(indexer.get_element("lib-card").is_none());
}

#[test]
fn test_multi_entity_file() {
    let (_dir, root) = temp_project();
    write_file(
        &root,
        "src/shared/forms.directive.ts",
        r"
            @Directive({ selector: '[appAutofocus]' })
            export class AutofocusDirective {}

            @Directive({ selector: 'input[appTrim], textarea[appTrim]' })
            export class TrimDirective {}
        ",
    );

    let indexer = make_indexer(&root);
    indexer.full_index().expect("full index");

    let autofocus = indexer.get_element("appAutofocus").expect("bare attribute");
    assert_eq!(autofocus.display_name, "AutofocusDirective");

    let trim = indexer.get_element("input[appTrim]").expect("full segment");
    assert_eq!(trim.display_name, "TrimDirective");
    assert_eq!(
        indexer.get_element("appTrim").expect("bare inner").display_name,
        "TrimDirective"
    );
}

#[test]
fn test_update_file_replaces_stale_selectors() {
    let (_dir, root) = temp_project();
    let path = write_file(
        &root,
        "src/app/badge.component.ts",
        r"
            @Component({ selector: 'app-badge-old' })
            export class BadgeComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    indexer.full_index().expect("full index");
    assert!(indexer.get_element("app-badge-old").is_some());

    std::fs::write(
        &path,
        r"
            @Component({ selector: 'app-badge-new' })
            export class BadgeComponent {}
        ",
    )
    .expect("rewrite file");
    indexer.update_file(&path).expect("update");

    assert!(indexer.get_element("app-badge-old").is_none());
    let record = indexer.get_element("app-badge-new").expect("new selector");
    assert_eq!(record.display_name, "BadgeComponent");
}

#[test]
fn test_update_file_unchanged_content_is_skipped() {
    let (_dir, root) = temp_project();
    let path = write_file(
        &root,
        "src/app/badge.component.ts",
        r"
            @Component({ selector: 'app-badge' })
            export class BadgeComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    indexer.full_index().expect("full index");

    indexer.update_file(&path).expect("update");
    assert_eq!(indexer.stats().files_unchanged, 1);
    assert!(indexer.get_element("app-badge").is_some());
}

#[test]
fn test_remove_file_drops_selectors() {
    let (_dir, root) = temp_project();
    let path = write_file(
        &root,
        "src/app/badge.component.ts",
        r"
            @Component({ selector: 'app-badge' })
            export class BadgeComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    indexer.full_index().expect("full index");
    assert!(indexer.get_element("app-badge").is_some());

    std::fs::remove_file(&path).expect("delete file");
    indexer.remove_file(&path);

    assert!(indexer.get_element("app-badge").is_none());
    assert!(indexer.snapshot().files.is_empty());
}

#[test]
fn test_snapshot_restore() {
    let (_dir, root) = temp_project();
    write_file(
        &root,
        "src/app/widget.component.ts",
        r"
            @Component({ selector: 'app-widget' })
            export class WidgetComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    let snapshot = indexer.full_index().expect("full index");

    let json = serde_json::to_string(&snapshot).expect("serialize snapshot");
    let parsed = serde_json::from_str(&json).expect("deserialize snapshot");

    let restored = make_indexer(&root);
    restored.restore(parsed);

    let record = restored.get_element("app-widget").expect("restored record");
    assert_eq!(record.display_name, "WidgetComponent");
    assert_eq!(restored.snapshot().files.len(), 1);
}

#[test]
fn test_prefix_search() {
    let (_dir, root) = temp_project();
    write_file(
        &root,
        "src/app/card.component.ts",
        r"
            @Component({ selector: 'app-card' })
            export class CardComponent {}
        ",
    );
    write_file(
        &root,
        "src/app/card-header.component.ts",
        r"
            @Component({ selector: 'app-card-header' })
            export class CardHeaderComponent {}
        ",
    );

    let indexer = make_indexer(&root);
    indexer.full_index().expect("full index");

    let matches = indexer.search_with_selectors("app-card");
    let selectors: Vec<&str> = matches.iter().map(|e| e.selector.as_str()).collect();
    assert!(selectors.contains(&"app-card"));
    assert!(selectors.contains(&"app-card-header"));
}

#[test]
fn test_library_module_resolution() {
    let (_dir, root) = temp_project();
    let deps = root.join("deps/ui-card");
    std::fs::create_dir_all(&deps).expect("create deps dir");

    let index_dts = write_file(
        &root,
        "deps/ui-card/index.d.ts",
        r#"
            export * from "./card.component";
            export * from "./card.module";
        "#,
    );
    write_file(
        &root,
        "deps/ui-card/card.component.d.ts",
        r#"
            import * as i0 from "@angular/core";
            export declare class CardComponent {
                static ɵfac: i0.ɵɵFactoryDeclaration<CardComponent, never>;
                static ɵcmp: i0.ɵɵComponentDeclaration<CardComponent, "ui-card", never, {}, {}, never, never, false, never>;
            }
        "#,
    );
    write_file(
        &root,
        "deps/ui-card/card.module.d.ts",
        r#"
            import * as i0 from "@angular/core";
            import * as i1 from "./card.component";
            export declare class CardModule {
                static ɵmod: i0.ɵɵNgModuleDeclaration<CardModule, [typeof i1.CardComponent], never, [typeof i1.CardComponent]>;
            }
        "#,
    );

    let indexer = make_indexer(&root);
    let mut library = LibraryIndexer::new(&indexer).expect("library indexer");
    let inserted = library.index_entry_points(&[LibraryEntryPoint::new("@ui/card", index_dts)]);
    assert_eq!(inserted, 1);

    // A module-declared entity resolves to the module's public surface,
    // not to the component class or its file path.
    let record = indexer.get_element("ui-card").expect("library record");
    assert_eq!(record.display_name, "CardModule");
    assert_eq!(record.import_source, "@ui/card");
    assert_eq!(record.exporting_module.as_deref(), Some("CardModule"));
    assert!(!record.is_standalone);
}

#[test]
fn test_library_standalone_entity_uses_entry_point() {
    let (_dir, root) = temp_project();
    let index_dts = write_file(
        &root,
        "deps/ui-tooltip/index.d.ts",
        r#"
            import * as i0 from "@angular/core";
            export declare class TooltipDirective {
                static ɵfac: i0.ɵɵFactoryDeclaration<TooltipDirective, never>;
                static ɵdir: i0.ɵɵDirectiveDeclaration<TooltipDirective, "[uiTooltip]", never, {}, {}, never, never, true, never>;
            }
        "#,
    );

    let indexer = make_indexer(&root);
    let mut library = LibraryIndexer::new(&indexer).expect("library indexer");
    library.index_entry_points(&[LibraryEntryPoint::new("@ui/tooltip", index_dts)]);

    let record = indexer.get_element("uiTooltip").expect("bare attribute");
    assert_eq!(record.display_name, "TooltipDirective");
    assert_eq!(record.import_source, "@ui/tooltip");
    assert!(record.is_standalone);
}

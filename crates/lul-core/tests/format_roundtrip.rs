//! Integration tests: layout files on disk (lul-core).
//!
//! Loads hand-written fixtures, replays them into documents, and checks
//! that save → load reproduces the same content.

use lul_core::format::{self, FORMAT_VERSION};
use lul_core::grid::Point;
use lul_core::{EmitConfig, LayoutDocument, LayoutError, WidgetKind, emit_source};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Replay intents the way the editor does: create, then tolerant properties.
fn replay(path: &std::path::Path) -> LayoutDocument {
    let mut doc = LayoutDocument::new(20);
    for intent in format::read_layout(path).unwrap() {
        let id = doc
            .create_widget(intent.kind, intent.position.x, intent.position.y)
            .id;
        for (key, value) in intent.properties {
            doc.set_property(id, &key, value).unwrap();
        }
    }
    doc
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn login_fixture_loads_in_file_order() {
    let doc = replay(&fixture("login.json"));
    let kinds: Vec<_> = doc.widgets().iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WidgetKind::Label,
            WidgetKind::Entry,
            WidgetKind::Label,
            WidgetKind::Entry,
            WidgetKind::Checkbutton,
            WidgetKind::Combobox,
            WidgetKind::Button,
        ]
    );
    assert_eq!(doc.widgets()[6].position, Point::new(140, 180));
}

#[test]
fn tolerant_properties_on_load() {
    let doc = replay(&fixture("login.json"));
    let widgets = doc.widgets();

    // Numbers are stringified.
    assert_eq!(widgets[1].property("width"), Some("24"));
    // Keys the kind does not accept are skipped.
    assert_eq!(widgets[3].property("show"), Some("*"));
    assert_eq!(widgets[3].property("bogus"), None);
    // Nulls are dropped, defaults stay.
    assert_eq!(widgets[4].property("variable"), None);
    assert_eq!(widgets[4].property("text"), Some("Remember me"));
    // Empty strings are kept as values.
    assert_eq!(widgets[0].property("font"), Some(""));
}

#[test]
fn unknown_type_rejects_whole_file() {
    let err = format::read_layout(fixture("unknown_type.json")).unwrap_err();
    match err {
        LayoutError::UnknownWidgetType(tag) => assert_eq!(tag, "Spinbox"),
        other => panic!("expected UnknownWidgetType, got {other:?}"),
    }
}

#[test]
fn nested_property_value_is_corrupt() {
    let err = format::read_layout(fixture("nested_property.json")).unwrap_err();
    assert!(matches!(err, LayoutError::CorruptDocument(_)));
}

#[test]
fn missing_file_is_io_failure() {
    let err = format::read_layout(fixture("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, LayoutError::IoFailure { .. }));
}

#[test]
fn truncated_json_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"version": "0.0.1", "widgets": [ {"type": "Button""#).unwrap();
    assert!(matches!(
        format::read_layout(&path),
        Err(LayoutError::CorruptDocument(_))
    ));
}

#[test]
fn off_grid_positions_snap_on_load() {
    let file = format::parse_json(
        r#"{"version": "0.0.1", "widgets": [{"type": "Label", "x": 23, "y": 57}]}"#,
    )
    .unwrap();
    let intents = format::from_document_format(&file).unwrap();
    let mut doc = LayoutDocument::new(20);
    let id = doc
        .create_widget(intents[0].kind, intents[0].position.x, intents[0].position.y)
        .id;
    assert_eq!(doc.get(id).unwrap().position, Point::new(20, 60));
    assert_eq!(doc.get(id).unwrap().property("text"), Some("Label"));
}

// ─── Save → load ────────────────────────────────────────────────────────

#[test]
fn save_then_load_reproduces_content() {
    let original = replay(&fixture("login.json"));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.json");
    format::write_layout(&original, &path).unwrap();

    let reloaded = replay(&path);
    assert!(original.same_content(&reloaded));

    let file = format::parse_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(file.version, FORMAT_VERSION);
    assert_eq!(file.widgets[4].kind, "Checkbutton");
    assert!(!dir.path().join("saved.json.tmp").exists());
}

#[test]
fn export_of_fixture_is_stable() {
    let doc = replay(&fixture("login.json"));
    let source = emit_source(&doc, &EmitConfig::default());
    assert!(source.starts_with("import tkinter as tk\nfrom tkinter import ttk\n"));
    assert!(source.contains("    widget_3 = ttk.Entry(root, show='*')\n"));
    assert!(source.contains("    widget_5 = ttk.Combobox(root, values=['en', 'fr', 'de'])\n"));
    assert!(source.contains("    widget_6.place(x=140, y=180)\n"));
    assert!(source.ends_with("if __name__ == '__main__':\n    create_gui()\n"));
}

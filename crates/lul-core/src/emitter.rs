//! Emitter: LayoutDocument → Python/Tkinter source.
//!
//! Output is a fixed prologue, one construction statement plus one
//! `place(x=.., y=..)` statement per widget in z-order, and a fixed epilogue.
//! The generated program is never parsed back.

use crate::catalog::{LIST_PROPERTIES, LIST_SEPARATOR, NUMERIC_PROPERTIES, TkModule};
use crate::config::EmitConfig;
use crate::model::{LayoutDocument, PlacedWidget};
use std::fmt::Write;

/// Emit a runnable Tkinter program that recreates `doc`.
#[must_use]
pub fn emit_source(doc: &LayoutDocument, config: &EmitConfig) -> String {
    let mut out = String::with_capacity(256 + doc.len() * 96);

    out.push_str("import tkinter as tk\n");
    out.push_str("from tkinter import ttk\n\n");
    out.push_str("def create_gui():\n");
    out.push_str("    root = tk.Tk()\n");
    let _ = writeln!(out, "    root.title({})", py_str(&config.title));
    if let Some(geometry) = &config.geometry {
        let _ = writeln!(out, "    root.geometry({})", py_str(geometry));
    }
    out.push('\n');

    for (i, widget) in doc.widgets().iter().enumerate() {
        emit_widget(&mut out, &format!("widget_{i}"), widget);
        out.push('\n');
    }

    out.push_str("    root.mainloop()\n\n");
    out.push_str("if __name__ == '__main__':\n");
    out.push_str("    create_gui()\n");
    out
}

fn emit_widget(out: &mut String, var: &str, widget: &PlacedWidget) {
    let spec = widget.kind.spec();

    match &spec.template {
        Some(template) => {
            let _ = write!(out, "    {var} = {}.{}(root", template.module.prefix(), spec.tag);
            for key in template.options {
                if let Some(value) = widget.property(key).filter(|v| !v.trim().is_empty()) {
                    let _ = write!(out, ", {}={}", kwarg(key), py_value(key, value));
                }
            }
            out.push_str(")\n");

            if let Some(items_key) = template.items
                && let Some(items) = widget.property(items_key).filter(|v| !v.trim().is_empty())
            {
                let _ = writeln!(out, "    for item in {}:", py_list(items));
                let _ = writeln!(out, "        {var}.insert(tk.END, item)");
            }
        }
        // Generic stub: bare constructor, properties not rendered.
        None => {
            let _ = writeln!(out, "    {var} = {}.{}(root)", TkModule::Ttk.prefix(), spec.tag);
        }
    }

    let _ = writeln!(
        out,
        "    {var}.place(x={}, y={})",
        widget.position.x, widget.position.y
    );
}

/// Tk option name as a Python keyword argument.
fn kwarg(key: &str) -> &str {
    match key {
        "from" => "from_",
        other => other,
    }
}

fn py_value(key: &str, value: &str) -> String {
    if LIST_PROPERTIES.contains(&key) {
        return py_list(value);
    }
    let trimmed = value.trim();
    if NUMERIC_PROPERTIES.contains(&key) && trimmed.parse::<f64>().is_ok() {
        return trimmed.to_string();
    }
    py_str(value)
}

fn py_list(value: &str) -> String {
    let items: Vec<String> = value
        .split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(py_str)
        .collect();
    format!("[{}]", items.join(", "))
}

/// Single-quoted Python string literal.
fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WidgetKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_prologue_and_epilogue() {
        let doc = LayoutDocument::new(20);
        let expected = "\
import tkinter as tk
from tkinter import ttk

def create_gui():
    root = tk.Tk()
    root.title('Generated GUI')

    root.mainloop()

if __name__ == '__main__':
    create_gui()
";
        assert_eq!(emit_source(&doc, &EmitConfig::default()), expected);
    }

    #[test]
    fn widgets_emit_in_z_order_with_placement() {
        let mut doc = LayoutDocument::new(20);
        let button = doc.create_widget(WidgetKind::Button, 23, 57).id;
        doc.create_widget(WidgetKind::Label, 100, 100);
        doc.set_property(button, "text", "Don't").unwrap();

        let src = emit_source(&doc, &EmitConfig::default());
        let expected_body = "\
    widget_0 = ttk.Button(root, text='Don\\'t')
    widget_0.place(x=20, y=60)

    widget_1 = ttk.Label(root, text='Label')
    widget_1.place(x=100, y=100)
";
        assert!(src.contains(expected_body), "{src}");
    }

    #[test]
    fn numeric_list_and_keyword_options() {
        let mut doc = LayoutDocument::new(20);
        doc.create_widget(WidgetKind::Scale, 0, 0);
        doc.create_widget(WidgetKind::Combobox, 0, 0);
        doc.create_widget(WidgetKind::Listbox, 0, 0);

        let src = emit_source(&doc, &EmitConfig::default());
        assert!(src.contains("widget_0 = ttk.Scale(root, from_=0, to=100)"), "{src}");
        assert!(
            src.contains("widget_1 = ttk.Combobox(root, values=['Option 1', 'Option 2', 'Option 3'])"),
            "{src}"
        );
        assert!(src.contains("widget_2 = tk.Listbox(root, height=4)"), "{src}");
        assert!(src.contains("    for item in ['Item 1', 'Item 2', 'Item 3']:\n        widget_2.insert(tk.END, item)"));
    }

    #[test]
    fn non_numeric_value_for_numeric_key_is_quoted() {
        let mut doc = LayoutDocument::new(20);
        let id = doc.create_widget(WidgetKind::Entry, 0, 0).id;
        doc.set_property(id, "width", "wide").unwrap();
        let src = emit_source(&doc, &EmitConfig::default());
        assert!(src.contains("ttk.Entry(root, width='wide')"), "{src}");
    }

    #[test]
    fn kind_without_template_uses_stub() {
        let mut doc = LayoutDocument::new(20);
        doc.create_widget(WidgetKind::Scrollbar, 40, 0);
        let src = emit_source(&doc, &EmitConfig::default());
        assert!(src.contains("    widget_0 = ttk.Scrollbar(root)\n    widget_0.place(x=40, y=0)\n"));
    }

    #[test]
    fn title_and_geometry_from_config() {
        let doc = LayoutDocument::new(20);
        let config = EmitConfig {
            title: "Login".into(),
            geometry: Some("320x200".into()),
        };
        let src = emit_source(&doc, &config);
        assert!(src.contains("    root.title('Login')\n    root.geometry('320x200')\n"));
    }

    #[test]
    fn every_kind_emits_a_placement() {
        let mut doc = LayoutDocument::new(20);
        for kind in WidgetKind::ALL {
            doc.create_widget(kind, 0, 0);
        }
        let src = emit_source(&doc, &EmitConfig::default());
        assert_eq!(src.matches(".place(x=0, y=0)").count(), WidgetKind::ALL.len());
    }
}

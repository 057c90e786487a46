//! The fixed widget catalog.
//!
//! One table row per [`WidgetKind`] holds everything the rest of the system
//! needs to know about a kind: its persisted tag, default properties, the
//! property keys that may be edited, and how to generate source for it.
//! Creation, property edits, the layout file, and the emitter all read this
//! table instead of matching on the kind themselves.

use crate::error::{LayoutError, Result};
use crate::model::PropertyBag;
use std::fmt;
use std::str::FromStr;

/// Every widget type the editor can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetKind {
    Button,
    Label,
    Entry,
    Text,
    Checkbutton,
    Radiobutton,
    Scale,
    Listbox,
    Scrollbar,
    Frame,
    LabelFrame,
    Combobox,
    Progressbar,
}

/// Which Tk namespace a generated constructor lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TkModule {
    Tk,
    Ttk,
}

impl TkModule {
    pub fn prefix(self) -> &'static str {
        match self {
            TkModule::Tk => "tk",
            TkModule::Ttk => "ttk",
        }
    }
}

/// How the emitter constructs a widget of a given kind.
#[derive(Debug)]
pub struct Template {
    pub module: TkModule,
    /// Property keys passed as constructor keyword arguments, in emit order.
    pub options: &'static [&'static str],
    /// Property holding comma-separated entries inserted after construction.
    pub items: Option<&'static str>,
}

/// A catalog row.
#[derive(Debug)]
pub struct KindSpec {
    pub kind: WidgetKind,
    /// Persisted tag, also the Tk class name.
    pub tag: &'static str,
    /// Short lowercase names accepted when parsing.
    pub alias: &'static str,
    pub defaults: &'static [(&'static str, &'static str)],
    pub properties: &'static [&'static str],
    /// `None` means the emitter falls back to a bare constructor stub.
    pub template: Option<Template>,
}

/// Property keys whose values are numbers in generated source.
pub const NUMERIC_PROPERTIES: &[&str] = &[
    "width",
    "height",
    "length",
    "from",
    "to",
    "value",
    "maximum",
    "borderwidth",
    "padding",
];

/// Property keys whose comma-separated values become a Python list.
pub const LIST_PROPERTIES: &[&str] = &["values"];

/// Separator used inside list-valued properties (`items`, `values`).
pub const LIST_SEPARATOR: char = ',';

static CATALOG: [KindSpec; 13] = [
    KindSpec {
        kind: WidgetKind::Button,
        tag: "Button",
        alias: "button",
        defaults: &[("text", "Button")],
        properties: &["text", "width", "command", "state"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["text", "width", "state"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Label,
        tag: "Label",
        alias: "label",
        defaults: &[("text", "Label")],
        properties: &["text", "width", "background", "foreground", "font", "anchor"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["text", "width", "background", "foreground", "font", "anchor"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Entry,
        tag: "Entry",
        alias: "entry",
        defaults: &[],
        properties: &["width", "show", "state", "font"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["width", "show", "state", "font"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Text,
        tag: "Text",
        alias: "text",
        defaults: &[("width", "30"), ("height", "5")],
        properties: &["width", "height", "wrap", "background", "foreground", "font"],
        template: Some(Template {
            module: TkModule::Tk,
            options: &["width", "height", "wrap", "background", "foreground", "font"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Checkbutton,
        tag: "Checkbutton",
        alias: "checkbox",
        defaults: &[("text", "Checkbutton")],
        properties: &["text", "width", "command", "state"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["text", "width", "state"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Radiobutton,
        tag: "Radiobutton",
        alias: "radio",
        defaults: &[("text", "Radiobutton")],
        properties: &["text", "width", "value", "command", "state"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["text", "width", "value", "state"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Scale,
        tag: "Scale",
        alias: "scale",
        defaults: &[("from", "0"), ("to", "100")],
        properties: &["from", "to", "orient", "length", "value"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["from", "to", "orient", "length", "value"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Listbox,
        tag: "Listbox",
        alias: "listbox",
        defaults: &[("height", "4"), ("items", "Item 1,Item 2,Item 3")],
        properties: &[
            "items",
            "width",
            "height",
            "selectmode",
            "background",
            "foreground",
            "font",
        ],
        template: Some(Template {
            module: TkModule::Tk,
            options: &["width", "height", "selectmode", "background", "foreground", "font"],
            items: Some("items"),
        }),
    },
    KindSpec {
        kind: WidgetKind::Scrollbar,
        tag: "Scrollbar",
        alias: "scrollbar",
        defaults: &[("orient", "vertical")],
        properties: &["orient"],
        template: None,
    },
    KindSpec {
        kind: WidgetKind::Frame,
        tag: "Frame",
        alias: "frame",
        defaults: &[("width", "200"), ("height", "200"), ("relief", "ridge")],
        properties: &["width", "height", "relief", "borderwidth", "padding"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["width", "height", "relief", "borderwidth", "padding"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::LabelFrame,
        tag: "LabelFrame",
        alias: "labelframe",
        defaults: &[("text", "LabelFrame"), ("width", "200"), ("height", "200")],
        properties: &["text", "width", "height", "relief", "padding"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["text", "width", "height", "relief", "padding"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Combobox,
        tag: "Combobox",
        alias: "combobox",
        defaults: &[("values", "Option 1,Option 2,Option 3")],
        properties: &["values", "width", "state"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["values", "width", "state"],
            items: None,
        }),
    },
    KindSpec {
        kind: WidgetKind::Progressbar,
        tag: "Progressbar",
        alias: "progressbar",
        defaults: &[("length", "200"), ("mode", "determinate"), ("value", "50")],
        properties: &["length", "mode", "value", "maximum", "orient"],
        template: Some(Template {
            module: TkModule::Ttk,
            options: &["length", "mode", "value", "maximum", "orient"],
            items: None,
        }),
    },
];

impl WidgetKind {
    /// All kinds in toolbox order.
    pub const ALL: [WidgetKind; 13] = [
        WidgetKind::Button,
        WidgetKind::Label,
        WidgetKind::Entry,
        WidgetKind::Text,
        WidgetKind::Checkbutton,
        WidgetKind::Radiobutton,
        WidgetKind::Scale,
        WidgetKind::Listbox,
        WidgetKind::Scrollbar,
        WidgetKind::Frame,
        WidgetKind::LabelFrame,
        WidgetKind::Combobox,
        WidgetKind::Progressbar,
    ];

    /// The catalog row for this kind.
    pub fn spec(self) -> &'static KindSpec {
        &CATALOG[self as usize]
    }

    /// Persisted tag (`"Button"`, `"Checkbutton"`, ...).
    pub fn tag(self) -> &'static str {
        self.spec().tag
    }

    /// Parse a tag or alias, case-insensitively.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        CATALOG
            .iter()
            .find(|row| row.tag.eq_ignore_ascii_case(tag) || row.alias.eq_ignore_ascii_case(tag))
            .map(|row| row.kind)
            .ok_or_else(|| LayoutError::UnknownWidgetType(tag.to_string()))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl FromStr for WidgetKind {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

/// Fresh default property bag for `kind`.
pub fn defaults_for(kind: WidgetKind) -> PropertyBag {
    kind.spec()
        .defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Whether `key` is an editable property of `kind`.
pub fn is_valid_property(kind: WidgetKind, key: &str) -> bool {
    kind.spec().properties.contains(&key)
}

/// Kinds whose tag contains `term`, case-insensitively. An empty term matches all.
pub fn filter(term: &str) -> Vec<WidgetKind> {
    let term = term.trim().to_ascii_lowercase();
    WidgetKind::ALL
        .into_iter()
        .filter(|kind| kind.tag().to_ascii_lowercase().contains(&term))
        .collect()
}

//! Layout file format: `LayoutDocument` ⇄ JSON.
//!
//! ```json
//! {
//!   "version": "0.0.1",
//!   "widgets": [
//!     { "type": "Button", "x": 20, "y": 60, "properties": { "text": "OK" } }
//!   ]
//! }
//! ```
//!
//! Widgets are listed in z-order. Loading is fail-closed: the whole record is
//! validated before any create intent is handed back, so an unknown widget
//! type or a malformed entry never yields a half-loaded document.

use crate::catalog::{self, WidgetKind};
use crate::error::{LayoutError, Result};
use crate::grid::Point;
use crate::model::{LayoutDocument, PropertyBag};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Version string written into every saved layout.
pub const FORMAT_VERSION: &str = "0.0.1";

/// Top-level persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    pub version: String,
    pub widgets: Vec<WidgetRecord>,
}

/// One persisted widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, deserialize_with = "deserialize_properties")]
    pub properties: PropertyBag,
}

/// A validated instruction to create one widget during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIntent {
    pub kind: WidgetKind,
    pub position: Point,
    /// Everything the file carried, including keys the kind may not accept.
    /// Callers re-apply these through the tolerant property path.
    pub properties: PropertyBag,
}

// ─── Document → record ───────────────────────────────────────────────────

/// Snapshot a document as a persistable record, in z-order.
#[must_use]
pub fn to_document_format(doc: &LayoutDocument) -> LayoutFile {
    LayoutFile {
        version: FORMAT_VERSION.to_string(),
        widgets: doc
            .widgets()
            .iter()
            .map(|w| WidgetRecord {
                kind: w.kind.tag().to_string(),
                x: w.position.x,
                y: w.position.y,
                properties: w.properties.clone(),
            })
            .collect(),
    }
}

/// Serialize a document as pretty-printed JSON.
pub fn to_json(doc: &LayoutDocument) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document_format(doc))?)
}

// ─── Record → create intents ─────────────────────────────────────────────

/// Turn a record into create intents in file order.
///
/// # Errors
/// `UnknownWidgetType` if any entry names a type outside the catalog. No
/// intents are returned in that case.
pub fn from_document_format(file: &LayoutFile) -> Result<Vec<CreateIntent>> {
    if file.version != FORMAT_VERSION {
        log::info!(
            "layout version {} differs from {FORMAT_VERSION}; loading anyway",
            file.version
        );
    }

    let intents = file
        .widgets
        .iter()
        .map(|record| -> Result<CreateIntent> {
            let kind = WidgetKind::from_tag(&record.kind)?;
            let skipped = record
                .properties
                .keys()
                .filter(|key| !catalog::is_valid_property(kind, key))
                .count();
            if skipped > 0 {
                log::debug!("{skipped} inapplicable properties on a {kind} record");
            }
            Ok(CreateIntent {
                kind,
                position: Point::new(record.x, record.y),
                properties: record.properties.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(intents)
}

/// Parse layout JSON into a record.
///
/// # Errors
/// `CorruptDocument` when the text is not a well-formed layout.
pub fn parse_json(text: &str) -> Result<LayoutFile> {
    Ok(serde_json::from_str(text)?)
}

// ─── Files ───────────────────────────────────────────────────────────────

/// Read and validate a layout file. Nothing outside this call observes a
/// partial result.
pub fn read_layout(path: impl AsRef<Path>) -> Result<Vec<CreateIntent>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
    let file = parse_json(&text)?;
    let intents = from_document_format(&file)?;
    log::info!("read {} widgets from {}", intents.len(), path.display());
    Ok(intents)
}

/// Save a document as JSON.
pub fn write_layout(doc: &LayoutDocument, path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(doc)?;
    write_atomically(path.as_ref(), json.as_bytes())?;
    log::info!("saved {} widgets to {}", doc.len(), path.as_ref().display());
    Ok(())
}

/// Write `contents` to a sibling temp file, then rename it over `path`, so
/// a failed write never leaves a truncated file behind.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let result = fs::File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(contents)?;
            f.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp);
        return Err(LayoutError::io(path, err));
    }
    Ok(())
}

// ─── Tolerant property map ───────────────────────────────────────────────

/// Accept string values, stringify numbers and booleans written by older
/// tools, drop nulls, and reject nested values.
fn deserialize_properties<'de, D>(deserializer: D) -> std::result::Result<PropertyBag, D::Error>
where
    D: Deserializer<'de>,
{
    struct PropertiesVisitor;

    impl<'de> Visitor<'de> for PropertiesVisitor {
        type Value = PropertyBag;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of property names to scalar values")
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<PropertyBag, E> {
            Ok(PropertyBag::new())
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<PropertyBag, A::Error> {
            let mut bag = PropertyBag::new();
            while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                let value = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    serde_json::Value::Null => continue,
                    serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                        return Err(de::Error::custom(format!(
                            "property '{key}' must be a scalar"
                        )));
                    }
                };
                bag.insert(key, value);
            }
            Ok(bag)
        }
    }

    deserializer.deserialize_any(PropertiesVisitor)
}

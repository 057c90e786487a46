pub mod catalog;
pub mod config;
pub mod emitter;
pub mod error;
pub mod format;
pub mod grid;
pub mod id;
pub mod model;

pub use catalog::{WidgetKind, defaults_for, is_valid_property};
pub use config::{EditorConfig, EmitConfig};
pub use emitter::emit_source;
pub use error::{LayoutError, Result};
pub use format::{CreateIntent, LayoutFile, WidgetRecord, from_document_format, to_document_format};
pub use grid::{Point, snap};
pub use id::{DocumentId, WidgetId};
pub use model::*;

//! Error types shared by the document model, the layout file format, and the
//! editor session.

use crate::id::WidgetId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while editing, loading, or saving a layout.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// An operation referenced a widget that is not in the document.
    #[error("widget {0} not found")]
    NotFound(WidgetId),

    /// A widget type tag outside the fixed catalog.
    #[error("unknown widget type '{0}'")]
    UnknownWidgetType(String),

    /// The persisted layout is missing fields or is structurally invalid.
    #[error("corrupt layout document: {0}")]
    CorruptDocument(String),

    /// Reading or writing a file failed.
    #[error("I/O failure on {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An insert would have put a second widget with the same id into the document.
    #[error("widget {0} is already in the document")]
    DuplicateWidget(WidgetId),
}

impl LayoutError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for LayoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::CorruptDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LayoutError>;

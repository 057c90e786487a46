//! Editor configuration.
//!
//! Plain structs with safe defaults. The CLI can read them from a JSON file;
//! any field left out keeps its default.

use crate::error::{LayoutError, Result};
use crate::grid::DEFAULT_GRID_UNIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ─── Editor ───────────────────────────────────────────────────────────────

/// Configuration for an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Pixel spacing every widget position snaps to. Default: **20**.
    pub grid_unit: i32,

    /// Maximum number of undo steps kept. Oldest steps are dropped first.
    /// Default: **200**.
    pub history_depth: usize,

    /// Options for generated source.
    pub emit: EmitConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_unit: DEFAULT_GRID_UNIT,
            history_depth: 200,
            emit: EmitConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Read a JSON config file and normalise it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LayoutError::io(path, e))?;
        let config: EditorConfig = serde_json::from_str(&text)?;
        Ok(config.normalized())
    }

    /// Clamp out-of-range values: the grid unit is at least 1 and the
    /// history keeps at least one step.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.grid_unit < 1 {
            log::warn!("grid_unit {} out of range, using 1", self.grid_unit);
            self.grid_unit = 1;
        }
        self.history_depth = self.history_depth.max(1);
        self
    }
}

// ─── Emit ─────────────────────────────────────────────────────────────────

/// Configuration for generated source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Window title of the generated program. Default: **"Generated GUI"**.
    pub title: String,

    /// Optional `WIDTHxHEIGHT` geometry for the generated root window.
    pub geometry: Option<String>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            title: "Generated GUI".to_string(),
            geometry: None,
        }
    }
}

//! Editor session: the single owner of the document, its history, and the
//! drag gesture.
//!
//! The view layer is a dispatcher. It turns menu items, toolbox clicks,
//! pointer events, and key presses into calls on [`Editor`] and shows any
//! returned error to the user. All calls run on one thread, one at a time.
//!
//! Any call that is not part of the drag protocol first cancels a drag in
//! progress, so a half-finished gesture never leaks into another command.

use crate::commands::{Command, CommandHistory};
use crate::drag::DragSession;
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{ToolAction, ToolKind, route};
use lul_core::format::{self, CreateIntent};
use lul_core::grid::Point;
use lul_core::id::WidgetId;
use lul_core::{EditorConfig, LayoutDocument, LayoutError, Result, WidgetKind, emit_source};
use std::path::{Path, PathBuf};

pub struct Editor {
    config: EditorConfig,
    document: LayoutDocument,
    history: CommandHistory,
    drag: DragSession,
    tool: ToolKind,
    /// Path of the last successful load or save.
    current_file: Option<PathBuf>,
    /// Set by any document change, cleared by new/load/save.
    modified: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.normalized();
        Self {
            document: LayoutDocument::new(config.grid_unit),
            history: CommandHistory::new(config.history_depth),
            drag: DragSession::new(),
            tool: ToolKind::Select,
            current_file: None,
            modified: false,
            config,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &LayoutDocument {
        &self.document
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Arm the toolbox: the next canvas click places `kind`.
    pub fn arm(&mut self, kind: WidgetKind) {
        self.tool = ToolKind::Place(kind);
    }

    pub fn disarm(&mut self) {
        self.tool = ToolKind::Select;
    }

    fn interrupt_drag(&mut self) {
        if self.drag.is_dragging() {
            self.drag.cancel(&mut self.document);
        }
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        self.interrupt_drag();
        self.history.execute(&mut self.document, command)?;
        self.modified = true;
        Ok(())
    }

    // ─── Placement & editing ─────────────────────────────────────────────

    /// Place a new widget at the grid point nearest `(x, y)`.
    pub fn place(&mut self, kind: WidgetKind, x: i32, y: i32) -> Result<WidgetId> {
        self.interrupt_drag();
        let widget = self.document.prepare_widget(kind, x, y);
        let id = widget.id;
        log::info!("place {} at {:?}", widget.label(), widget.position);
        self.execute(Command::Create { widget })?;
        Ok(id)
    }

    pub fn delete(&mut self, id: WidgetId) -> Result<()> {
        self.interrupt_drag();
        let command = Command::delete(&self.document, id)?;
        self.execute(command)
    }

    /// Delete the selected widget. Returns its id, or `None` when nothing
    /// was selected.
    pub fn delete_selected(&mut self) -> Result<Option<WidgetId>> {
        self.interrupt_drag();
        let Some(id) = self.document.selection() else {
            return Ok(None);
        };
        self.delete(id)?;
        Ok(Some(id))
    }

    /// Edit a property as an undoable step. Returns whether anything changed.
    ///
    /// `x` and `y` edit the position (snapped) rather than the property bag.
    /// Keys the widget's kind does not accept, and non-integer positions,
    /// are skipped.
    pub fn set_property(&mut self, id: WidgetId, key: &str, value: &str) -> Result<bool> {
        self.interrupt_drag();
        if key == "x" || key == "y" {
            return self.set_position_property(id, key, value);
        }
        match Command::set_property(&self.document, id, key, Some(value.to_string()))? {
            Some(command) => {
                self.execute(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn set_position_property(&mut self, id: WidgetId, key: &str, value: &str) -> Result<bool> {
        let from = self
            .document
            .get(id)
            .ok_or(LayoutError::NotFound(id))?
            .position;
        let Ok(coord) = value.trim().parse::<i32>() else {
            log::warn!("ignoring non-integer {key}={value:?} for {id}");
            return Ok(false);
        };
        let raw = if key == "x" {
            Point::new(coord, from.y)
        } else {
            Point::new(from.x, coord)
        };
        let to = raw.snapped(self.document.grid_unit());
        if to == from {
            return Ok(false);
        }
        self.execute(Command::Move { id, from, to })?;
        Ok(true)
    }

    pub fn select(&mut self, id: WidgetId) -> Result<()> {
        self.interrupt_drag();
        self.document.select(id)
    }

    pub fn deselect(&mut self) {
        self.interrupt_drag();
        self.document.clear_selection();
    }

    /// Bring to front / send to back. Not recorded in the history.
    pub fn reorder(&mut self, id: WidgetId, to_front: bool) -> Result<()> {
        self.interrupt_drag();
        self.document.reorder(id, to_front)?;
        self.modified = true;
        Ok(())
    }

    // ─── Drag protocol ───────────────────────────────────────────────────

    pub fn begin_drag(&mut self, id: WidgetId, pointer: Point) -> Result<()> {
        self.drag.begin(&mut self.document, id, pointer)
    }

    pub fn update_drag(&mut self, pointer: Point) -> Result<Option<Point>> {
        self.drag.update(&mut self.document, pointer)
    }

    /// Finish a drag. Returns whether a move was recorded.
    pub fn end_drag(&mut self, pointer: Point) -> Result<bool> {
        let recorded = self
            .drag
            .end(&mut self.document, &mut self.history, pointer)?;
        if recorded {
            self.modified = true;
        }
        Ok(recorded)
    }

    pub fn cancel_drag(&mut self) {
        self.interrupt_drag();
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<Option<String>> {
        self.interrupt_drag();
        let desc = self.history.undo(&mut self.document)?;
        if desc.is_some() {
            self.modified = true;
        }
        Ok(desc)
    }

    pub fn redo(&mut self) -> Result<Option<String>> {
        self.interrupt_drag();
        let desc = self.history.redo(&mut self.document)?;
        if desc.is_some() {
            self.modified = true;
        }
        Ok(desc)
    }

    // ─── Files ───────────────────────────────────────────────────────────

    /// Discard the current document and history.
    pub fn new_document(&mut self) {
        self.interrupt_drag();
        self.document = LayoutDocument::new(self.config.grid_unit);
        self.history = CommandHistory::new(self.config.history_depth);
        self.tool = ToolKind::Select;
        self.current_file = None;
        self.modified = false;
        log::info!("new document");
    }

    /// Replace the document with the layout at `path`.
    ///
    /// The file is read, validated, and rebuilt into a fresh document before
    /// anything is swapped in; on any error the open document is untouched.
    /// The loaded document starts with an empty history.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let intents = format::read_layout(path)?;
        let document = self.rebuild(intents)?;

        self.interrupt_drag();
        self.document = document;
        self.history = CommandHistory::new(self.config.history_depth);
        self.tool = ToolKind::Select;
        self.current_file = Some(path.to_path_buf());
        self.modified = false;
        log::info!("opened {} ({} widgets)", path.display(), self.document.len());
        Ok(())
    }

    /// Replay create intents in file order, re-applying properties after
    /// each create under the tolerant policy.
    fn rebuild(&self, intents: Vec<CreateIntent>) -> Result<LayoutDocument> {
        let mut document = LayoutDocument::new(self.config.grid_unit);
        let mut history = CommandHistory::new(intents.len().max(1));
        for intent in intents {
            let widget = document.prepare_widget(intent.kind, intent.position.x, intent.position.y);
            let id = widget.id;
            history.execute(&mut document, Command::Create { widget })?;
            for (key, value) in intent.properties {
                document.set_property(id, &key, value)?;
            }
        }
        Ok(document)
    }

    /// Save to the current file. Returns `false` when no file is bound yet
    /// and the view should ask for a path and call [`Editor::save_as`].
    pub fn save(&mut self) -> Result<bool> {
        let Some(path) = self.current_file.clone() else {
            return Ok(false);
        };
        self.save_as(path)?;
        Ok(true)
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.interrupt_drag();
        let path = path.as_ref();
        format::write_layout(&self.document, path)?;
        self.current_file = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Generated program for the current document.
    pub fn generated_source(&self) -> String {
        emit_source(&self.document, &self.config.emit)
    }

    pub fn export_source(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.interrupt_drag();
        let path = path.as_ref();
        let source = self.generated_source();
        format::write_atomically(path, source.as_bytes())?;
        log::info!("exported source to {}", path.display());
        Ok(())
    }

    // ─── Input dispatch ──────────────────────────────────────────────────

    /// Route a raw input event. `hit` is the topmost widget under the
    /// pointer. Returns a shortcut the view must finish itself (file
    /// dialogs, confirmations), if the event resolved to one.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        hit: Option<WidgetId>,
    ) -> Result<Option<ShortcutAction>> {
        if let InputEvent::Key { key, modifiers } = event {
            let Some(action) = ShortcutMap::resolve(key, *modifiers) else {
                return Ok(None);
            };
            return Ok(if self.apply_shortcut(action)? {
                None
            } else {
                Some(action)
            });
        }

        match route(self.tool, event, hit) {
            ToolAction::Place { kind, at } => {
                self.place(kind, at.x, at.y)?;
                self.tool = ToolKind::Select;
            }
            ToolAction::BeginDrag { id, at } => self.begin_drag(id, at)?,
            ToolAction::UpdateDrag { at } => {
                self.update_drag(at)?;
            }
            ToolAction::EndDrag { at } => {
                self.end_drag(at)?;
            }
            ToolAction::CancelDrag => self.cancel_drag(),
            ToolAction::ClearSelection => self.deselect(),
            ToolAction::Nothing => {}
        }
        Ok(None)
    }

    /// Run a shortcut that needs nothing from the view. Returns `false` for
    /// actions the view has to complete.
    pub fn apply_shortcut(&mut self, action: ShortcutAction) -> Result<bool> {
        if action.needs_view() {
            return Ok(false);
        }
        match action {
            ShortcutAction::Undo => {
                self.undo()?;
            }
            ShortcutAction::Redo => {
                self.redo()?;
            }
            ShortcutAction::Delete => {
                self.delete_selected()?;
            }
            ShortcutAction::Deselect => {
                self.deselect();
                self.disarm();
            }
            ShortcutAction::BringToFront | ShortcutAction::SendToBack => {
                if let Some(id) = self.document.selection() {
                    self.reorder(id, action == ShortcutAction::BringToFront)?;
                }
            }
            ShortcutAction::New | ShortcutAction::Open | ShortcutAction::Save | ShortcutAction::SaveAs => {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

//! Undo/Redo command history.
//!
//! Every document mutation the user can undo is a [`Command`] that carries
//! value snapshots (ids, positions, property values), never live references.
//! `execute` applies a command and pushes it onto the undo stack; `undo`
//! pops and applies the inverse; `redo` re-applies. A new command clears
//! the redo stack.
//!
//! Drag gestures move the widget live and then `record` a single `Move`
//! for the whole gesture, so one drag is one undo step.

use lul_core::grid::Point;
use lul_core::id::WidgetId;
use lul_core::{LayoutDocument, LayoutError, PlacedWidget, Result, is_valid_property};

/// A reversible document mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Put `widget` on top of the z-order.
    Create { widget: PlacedWidget },
    /// Remove `widget`, which sat at `index` when the command was built.
    Delete { widget: PlacedWidget, index: usize },
    /// Move a widget between two grid positions.
    Move {
        id: WidgetId,
        from: Point,
        to: Point,
    },
    /// Change one property. `None` means the key is absent.
    SetProperty {
        id: WidgetId,
        key: String,
        old: Option<String>,
        new: Option<String>,
    },
}

impl Command {
    /// Build a `Delete` that snapshots the widget as it is right now,
    /// including edits made after it was created.
    pub fn delete(doc: &LayoutDocument, id: WidgetId) -> Result<Self> {
        let index = doc.index_of(id).ok_or(LayoutError::NotFound(id))?;
        let mut widget = doc.widgets()[index].clone();
        widget.selected = false;
        Ok(Command::Delete { widget, index })
    }

    /// Build a `SetProperty` from the current value.
    ///
    /// Returns `Ok(None)` when there is nothing to record: the key is not
    /// editable on this kind, or the value would not change.
    pub fn set_property(
        doc: &LayoutDocument,
        id: WidgetId,
        key: &str,
        value: Option<String>,
    ) -> Result<Option<Self>> {
        let widget = doc.get(id).ok_or(LayoutError::NotFound(id))?;
        if !is_valid_property(widget.kind, key) {
            log::debug!("property '{key}' not editable on {}", widget.label());
            return Ok(None);
        }
        let old = widget.properties.get(key).cloned();
        if old == value {
            return Ok(None);
        }
        Ok(Some(Command::SetProperty {
            id,
            key: key.to_string(),
            old,
            new: value,
        }))
    }

    /// The command that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Command {
        match self {
            Command::Create { widget } => Command::Delete {
                widget: widget.clone(),
                index: usize::MAX,
            },
            Command::Delete { widget, .. } => Command::Create {
                widget: widget.clone(),
            },
            Command::Move { id, from, to } => Command::Move {
                id: *id,
                from: *to,
                to: *from,
            },
            Command::SetProperty { id, key, old, new } => Command::SetProperty {
                id: *id,
                key: key.clone(),
                old: new.clone(),
                new: old.clone(),
            },
        }
    }

    /// Apply the forward effect. On error the document is unchanged.
    pub fn apply(&self, doc: &mut LayoutDocument) -> Result<()> {
        match self {
            Command::Create { widget } => doc.insert_widget(widget.clone(), None),
            Command::Delete { widget, .. } => doc.delete_widget(widget.id).map(|_| ()),
            Command::Move { id, to, .. } => doc.move_widget(*id, to.x, to.y).map(|_| ()),
            Command::SetProperty { id, key, new, .. } => {
                doc.write_property(*id, key, new.clone()).map(|_| ())
            }
        }
    }

    /// Apply the inverse effect. On error the document is unchanged.
    pub fn revert(&self, doc: &mut LayoutDocument) -> Result<()> {
        match self {
            // Restoring by index keeps the widget's original z-order slot.
            Command::Delete { widget, index } => doc.insert_widget(widget.clone(), Some(*index)),
            other => other.inverse().apply(doc),
        }
    }

    /// Status-bar text, e.g. "Move Button #1".
    pub fn description(&self) -> String {
        match self {
            Command::Create { widget } => format!("Create {}", widget.label()),
            Command::Delete { widget, .. } => format!("Delete {}", widget.label()),
            Command::Move { id, .. } => format!("Move {id}"),
            Command::SetProperty { id, key, .. } => format!("Set {key} on {id}"),
        }
    }
}

/// Undo and redo stacks, most recent last.
pub struct CommandHistory {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(200)
    }
}

impl CommandHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Apply `command` and make it the newest undo step.
    ///
    /// If the command fails, neither the document nor the stacks change.
    pub fn execute(&mut self, doc: &mut LayoutDocument, command: Command) -> Result<()> {
        command.apply(doc)?;
        log::debug!("execute: {}", command.description());
        self.push(command);
        Ok(())
    }

    /// Push a command whose effect is already on the document.
    pub fn record(&mut self, command: Command) {
        log::debug!("record: {}", command.description());
        self.push(command);
    }

    fn push(&mut self, command: Command) {
        self.undo_stack.push(command);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    /// Undo the newest command. Returns its description, or `None` when
    /// there is nothing to undo.
    ///
    /// If the inverse fails the command stays on the undo stack.
    pub fn undo(&mut self, doc: &mut LayoutDocument) -> Result<Option<String>> {
        let Some(command) = self.undo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.revert(doc) {
            log::warn!("undo of '{}' failed: {err}", command.description());
            self.undo_stack.push(command);
            return Err(err);
        }
        let desc = command.description();
        log::debug!("undo: {desc}");
        self.redo_stack.push(command);
        Ok(Some(desc))
    }

    /// Redo the newest undone command.
    ///
    /// If it fails the command stays on the redo stack.
    pub fn redo(&mut self, doc: &mut LayoutDocument) -> Result<Option<String>> {
        let Some(command) = self.redo_stack.pop() else {
            return Ok(None);
        };
        if let Err(err) = command.apply(doc) {
            log::warn!("redo of '{}' failed: {err}", command.description());
            self.redo_stack.push(command);
            return Err(err);
        }
        let desc = command.description();
        log::debug!("redo: {desc}");
        self.undo_stack.push(command);
        Ok(Some(desc))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Newest undo step, if any.
    pub fn last(&self) -> Option<&Command> {
        self.undo_stack.last()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

//! Pointer-driven move of one widget.
//!
//! `Idle → Dragging` on pointer-down over a widget, `Dragging → Idle` on
//! pointer-up or cancel. While dragging, every pointer move snaps the
//! target and moves the widget directly so the canvas shows a grid-aligned
//! position at all times. Nothing touches the history until the gesture
//! ends, and then at most one `Move` for the net displacement is recorded.

use crate::commands::{Command, CommandHistory};
use lul_core::grid::Point;
use lul_core::id::WidgetId;
use lul_core::{LayoutDocument, LayoutError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging {
        widget: WidgetId,
        pointer_start: Point,
        widget_start: Point,
    },
}

/// Drag state machine. Owned by the editor, lives as long as the document,
/// but only holds state between pointer-down and pointer-up.
#[derive(Debug)]
pub struct DragSession {
    state: DragState,
}

impl Default for DragSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DragSession {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Widget being dragged, if any.
    pub fn widget(&self) -> Option<WidgetId> {
        match self.state {
            DragState::Dragging { widget, .. } => Some(widget),
            DragState::Idle => None,
        }
    }

    /// Start dragging `id` from `pointer`. Selects the widget.
    ///
    /// A drag already in progress is cancelled first.
    pub fn begin(&mut self, doc: &mut LayoutDocument, id: WidgetId, pointer: Point) -> Result<()> {
        if self.is_dragging() {
            self.cancel(doc);
        }
        let widget_start = doc.get(id).ok_or(LayoutError::NotFound(id))?.position;
        doc.select(id)?;
        self.state = DragState::Dragging {
            widget: id,
            pointer_start: pointer,
            widget_start,
        };
        log::trace!("drag begin {id} at {pointer:?}");
        Ok(())
    }

    /// Follow the pointer. Returns the widget's snapped position, or `None`
    /// when no drag is active.
    ///
    /// If the widget vanished mid-gesture the session is torn down and
    /// `NotFound` is returned.
    pub fn update(&mut self, doc: &mut LayoutDocument, pointer: Point) -> Result<Option<Point>> {
        let DragState::Dragging {
            widget,
            pointer_start,
            widget_start,
        } = self.state
        else {
            return Ok(None);
        };

        let Some(current) = doc.get(widget).map(|w| w.position) else {
            self.state = DragState::Idle;
            return Err(LayoutError::NotFound(widget));
        };
        let target = (pointer - pointer_start + widget_start).snapped(doc.grid_unit());
        if target != current {
            doc.move_widget(widget, target.x, target.y)?;
        }
        Ok(Some(target))
    }

    /// Finish the gesture at `pointer`. Records one `Move` when the widget
    /// ended up somewhere other than where it started. Returns whether a
    /// command was recorded.
    pub fn end(
        &mut self,
        doc: &mut LayoutDocument,
        history: &mut CommandHistory,
        pointer: Point,
    ) -> Result<bool> {
        let DragState::Dragging {
            widget,
            widget_start,
            ..
        } = self.state
        else {
            return Ok(false);
        };

        // Always leave the session idle, even if the final update fails.
        let result = self.update(doc, pointer);
        self.state = DragState::Idle;
        result?;

        let finish = doc.get(widget).ok_or(LayoutError::NotFound(widget))?.position;
        if finish == widget_start {
            log::trace!("drag end {widget}: no net movement");
            return Ok(false);
        }
        history.record(Command::Move {
            id: widget,
            from: widget_start,
            to: finish,
        });
        Ok(true)
    }

    /// Abandon the gesture (focus loss, another command arriving). The widget
    /// goes back to where the drag started and nothing is recorded.
    pub fn cancel(&mut self, doc: &mut LayoutDocument) {
        let DragState::Dragging {
            widget,
            widget_start,
            ..
        } = self.state
        else {
            return;
        };
        self.state = DragState::Idle;
        if let Err(err) = doc.move_widget(widget, widget_start.x, widget_start.y) {
            log::warn!("drag cancel could not restore {widget}: {err}");
        } else {
            log::debug!("drag cancelled, {widget} back at {widget_start:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lul_core::WidgetKind;

    fn setup() -> (LayoutDocument, CommandHistory, WidgetId) {
        let mut doc = LayoutDocument::new(20);
        let id = doc.create_widget(WidgetKind::Button, 20, 60).id;
        (doc, CommandHistory::new(100), id)
    }

    #[test]
    fn begin_selects_widget() {
        let (mut doc, _, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(25, 65)).unwrap();
        assert!(drag.is_dragging());
        assert_eq!(drag.widget(), Some(id));
        assert_eq!(doc.selection(), Some(id));
    }

    #[test]
    fn begin_on_missing_widget_stays_idle() {
        let (mut doc, _, _) = setup();
        let mut drag = DragSession::new();
        assert!(drag.begin(&mut doc, WidgetId::new(50), Point::ORIGIN).is_err());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn update_keeps_position_on_grid() {
        let (mut doc, _, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(0, 0)).unwrap();

        for (dx, dy) in [(3, 1), (9, 9), (11, 29), (47, 53)] {
            let pos = drag.update(&mut doc, Point::new(dx, dy)).unwrap().unwrap();
            assert_eq!(pos.x % 20, 0);
            assert_eq!(pos.y % 20, 0);
            assert_eq!(doc.get(id).unwrap().position, pos);
        }
    }

    #[test]
    fn update_when_idle_is_none() {
        let (mut doc, _, _) = setup();
        let mut drag = DragSession::new();
        assert_eq!(drag.update(&mut doc, Point::new(5, 5)).unwrap(), None);
    }

    #[test]
    fn many_moves_record_one_step() {
        let (mut doc, mut history, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(0, 0)).unwrap();
        for x in (0..=100).step_by(5) {
            drag.update(&mut doc, Point::new(x, 0)).unwrap();
        }
        assert!(drag.end(&mut doc, &mut history, Point::new(100, 0)).unwrap());
        assert!(!drag.is_dragging());
        assert_eq!(history.undo_len(), 1);
        assert_eq!(
            history.last(),
            Some(&Command::Move {
                id,
                from: Point::new(20, 60),
                to: Point::new(120, 60),
            })
        );
    }

    #[test]
    fn net_zero_drag_records_nothing() {
        let (mut doc, mut history, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(30, 70)).unwrap();
        drag.update(&mut doc, Point::new(90, 70)).unwrap();
        drag.update(&mut doc, Point::new(90, 130)).unwrap();
        assert!(!drag.end(&mut doc, &mut history, Point::new(34, 72)).unwrap());
        assert_eq!(history.undo_len(), 0);
        assert_eq!(doc.get(id).unwrap().position, Point::new(20, 60));
    }

    #[test]
    fn cancel_restores_start_without_history() {
        let (mut doc, mut history, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(0, 0)).unwrap();
        drag.update(&mut doc, Point::new(200, 200)).unwrap();
        drag.cancel(&mut doc);
        assert!(!drag.is_dragging());
        assert_eq!(doc.get(id).unwrap().position, Point::new(20, 60));
        assert!(!drag.end(&mut doc, &mut history, Point::new(0, 0)).unwrap());
        assert_eq!(history.undo_len(), 0);
    }

    #[test]
    fn widget_removed_mid_drag_tears_down() {
        let (mut doc, mut history, id) = setup();
        let mut drag = DragSession::new();
        drag.begin(&mut doc, id, Point::new(0, 0)).unwrap();
        doc.delete_widget(id).unwrap();
        assert!(matches!(
            drag.end(&mut doc, &mut history, Point::new(40, 0)),
            Err(LayoutError::NotFound(_))
        ));
        assert!(!drag.is_dragging());
        assert_eq!(history.undo_len(), 0);
    }
}

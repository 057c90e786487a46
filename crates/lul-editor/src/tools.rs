//! Canvas tools.
//!
//! The toolbox either has nothing armed (`Select`: clicks select and drag
//! widgets) or has a widget kind armed (`Place`: the next click drops that
//! kind on the canvas, then the tool falls back to `Select`).

use crate::input::InputEvent;
use lul_core::WidgetKind;
use lul_core::grid::Point;
use lul_core::id::WidgetId;

/// The active tool determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Place(WidgetKind),
}

/// What a pointer event means under the active tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    Place { kind: WidgetKind, at: Point },
    BeginDrag { id: WidgetId, at: Point },
    UpdateDrag { at: Point },
    EndDrag { at: Point },
    CancelDrag,
    ClearSelection,
    Nothing,
}

/// Interpret `event` for `tool`. `hit` is the topmost widget under the
/// pointer, as determined by the view's hit test.
pub fn route(tool: ToolKind, event: &InputEvent, hit: Option<WidgetId>) -> ToolAction {
    match (tool, event) {
        (ToolKind::Place(kind), InputEvent::PointerDown { x, y }) => ToolAction::Place {
            kind,
            at: Point::new(*x, *y),
        },
        (ToolKind::Select, InputEvent::PointerDown { x, y }) => match hit {
            Some(id) => ToolAction::BeginDrag {
                id,
                at: Point::new(*x, *y),
            },
            None => ToolAction::ClearSelection,
        },
        (_, InputEvent::PointerMove { x, y }) => ToolAction::UpdateDrag {
            at: Point::new(*x, *y),
        },
        (_, InputEvent::PointerUp { x, y }) => ToolAction::EndDrag {
            at: Point::new(*x, *y),
        },
        (_, InputEvent::FocusLost) => ToolAction::CancelDrag,
        (_, InputEvent::Key { .. }) => ToolAction::Nothing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armed_tool_places_on_click() {
        let action = route(
            ToolKind::Place(WidgetKind::Entry),
            &InputEvent::PointerDown { x: 33, y: 41 },
            Some(WidgetId::new(1)),
        );
        assert_eq!(
            action,
            ToolAction::Place {
                kind: WidgetKind::Entry,
                at: Point::new(33, 41)
            }
        );
    }

    #[test]
    fn select_tool_drags_hit_widget() {
        let id = WidgetId::new(4);
        assert_eq!(
            route(ToolKind::Select, &InputEvent::PointerDown { x: 1, y: 2 }, Some(id)),
            ToolAction::BeginDrag {
                id,
                at: Point::new(1, 2)
            }
        );
    }

    #[test]
    fn click_on_empty_canvas_clears_selection() {
        assert_eq!(
            route(ToolKind::Select, &InputEvent::PointerDown { x: 1, y: 2 }, None),
            ToolAction::ClearSelection
        );
    }

    #[test]
    fn focus_loss_cancels() {
        assert_eq!(
            route(ToolKind::Select, &InputEvent::FocusLost, None),
            ToolAction::CancelDrag
        );
    }
}

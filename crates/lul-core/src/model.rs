//! Layout document model.
//!
//! A [`LayoutDocument`] is an ordered list of [`PlacedWidget`]s plus the
//! current selection. List order is paint order: later widgets draw on top.
//! Positions are grid-snapped on every mutation, ids are never reused, and
//! at most one widget is selected at a time.

use crate::catalog::{self, WidgetKind};
use crate::error::{LayoutError, Result};
use crate::grid::{DEFAULT_GRID_UNIT, Point};
use crate::id::{DocumentId, WidgetId};
use std::collections::BTreeMap;

/// Property name → value. Sorted so saves and diffs are deterministic.
pub type PropertyBag = BTreeMap<String, String>;

// ─── Placed widget ───────────────────────────────────────────────────────

/// One catalog widget placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWidget {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub position: Point,
    pub properties: PropertyBag,
    pub selected: bool,
    /// Back-reference to the owning document. Never owns it.
    pub document: DocumentId,
}

impl PlacedWidget {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Short human label, e.g. `Button #3`.
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.id)
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The single source of truth for what is on the canvas.
#[derive(Debug, Clone)]
pub struct LayoutDocument {
    id: DocumentId,
    widgets: Vec<PlacedWidget>,
    selection: Option<WidgetId>,
    next_id: u64,
    grid_unit: i32,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_UNIT)
    }
}

impl LayoutDocument {
    pub fn new(grid_unit: i32) -> Self {
        Self {
            id: DocumentId::next(),
            widgets: Vec::new(),
            selection: None,
            next_id: 1,
            grid_unit,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn grid_unit(&self) -> i32 {
        self.grid_unit
    }

    /// Widgets in z-order (bottom first).
    pub fn widgets(&self) -> &[PlacedWidget] {
        &self.widgets
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn selection(&self) -> Option<WidgetId> {
        self.selection
    }

    pub fn selected_widget(&self) -> Option<&PlacedWidget> {
        self.selection.and_then(|id| self.get(id))
    }

    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.widgets.iter().position(|w| w.id == id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&PlacedWidget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.index_of(id).is_some()
    }

    fn get_mut(&mut self, id: WidgetId) -> Result<&mut PlacedWidget> {
        self.widgets
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(LayoutError::NotFound(id))
    }

    /// Whether two documents hold the same widgets in the same order with
    /// the same selection. Document handles and id counters are ignored.
    pub fn same_content(&self, other: &LayoutDocument) -> bool {
        self.selection == other.selection
            && self.widgets.len() == other.widgets.len()
            && self.widgets.iter().zip(&other.widgets).all(|(a, b)| {
                a.id == b.id
                    && a.kind == b.kind
                    && a.position == b.position
                    && a.properties == b.properties
                    && a.selected == b.selected
            })
    }

    // ─── Creation ────────────────────────────────────────────────────────

    /// Build a new widget with a fresh id, snapped position, and catalog
    /// defaults, without inserting it.
    pub fn prepare_widget(&mut self, kind: WidgetKind, x: i32, y: i32) -> PlacedWidget {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        PlacedWidget {
            id,
            kind,
            position: Point::new(x, y).snapped(self.grid_unit),
            properties: catalog::defaults_for(kind),
            selected: false,
            document: self.id,
        }
    }

    /// Create a widget and put it on top of the z-order.
    pub fn create_widget(&mut self, kind: WidgetKind, x: i32, y: i32) -> &PlacedWidget {
        let widget = self.prepare_widget(kind, x, y);
        log::debug!("create {} at {:?}", widget.label(), widget.position);
        let index = self.widgets.len();
        self.widgets.push(widget);
        &self.widgets[index]
    }

    /// Insert a widget snapshot at `index` (clamped), or on top when `None`.
    ///
    /// The snapshot's position is re-snapped and its selection flag cleared.
    /// Fails if a widget with the same id is already present.
    pub fn insert_widget(&mut self, mut widget: PlacedWidget, index: Option<usize>) -> Result<()> {
        if self.contains(widget.id) {
            return Err(LayoutError::DuplicateWidget(widget.id));
        }
        if widget.document != self.id {
            log::warn!(
                "adopting {} from another document into {:?}",
                widget.label(),
                self.id
            );
            widget.document = self.id;
        }
        widget.position = widget.position.snapped(self.grid_unit);
        widget.selected = false;
        // Keep the allocator ahead of any id that enters the document.
        self.next_id = self.next_id.max(widget.id.get() + 1);

        let index = index.unwrap_or(self.widgets.len()).min(self.widgets.len());
        self.widgets.insert(index, widget);
        Ok(())
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Remove a widget, returning it and the z-index it occupied.
    pub fn delete_widget(&mut self, id: WidgetId) -> Result<(PlacedWidget, usize)> {
        let index = self.index_of(id).ok_or(LayoutError::NotFound(id))?;
        let mut widget = self.widgets.remove(index);
        if self.selection == Some(id) {
            self.selection = None;
        }
        widget.selected = false;
        log::debug!("delete {} (z-index {index})", widget.label());
        Ok((widget, index))
    }

    /// Move a widget to the grid point nearest `(x, y)`. Returns the old position.
    pub fn move_widget(&mut self, id: WidgetId, x: i32, y: i32) -> Result<Point> {
        let target = Point::new(x, y).snapped(self.grid_unit);
        let widget = self.get_mut(id)?;
        let previous = widget.position;
        widget.position = target;
        log::trace!("move {id} {previous:?} -> {target:?}");
        Ok(previous)
    }

    /// Set a property. Keys the catalog does not list for the widget's kind
    /// are skipped and `Ok(false)` is returned.
    pub fn set_property(
        &mut self,
        id: WidgetId,
        key: &str,
        value: impl Into<String>,
    ) -> Result<bool> {
        self.write_property(id, key, Some(value.into()))
    }

    /// Remove a property. Returns whether the key was editable on this kind.
    pub fn clear_property(&mut self, id: WidgetId, key: &str) -> Result<bool> {
        self.write_property(id, key, None)
    }

    /// Set (`Some`) or remove (`None`) a property under the tolerant policy.
    pub fn write_property(&mut self, id: WidgetId, key: &str, value: Option<String>) -> Result<bool> {
        let widget = self.get_mut(id)?;
        if !catalog::is_valid_property(widget.kind, key) {
            log::debug!("skip property '{key}' on {}", widget.label());
            return Ok(false);
        }
        match value {
            Some(value) => {
                widget.properties.insert(key.to_string(), value);
            }
            None => {
                widget.properties.remove(key);
            }
        }
        Ok(true)
    }

    /// Select `id`, deselecting whatever was selected before.
    pub fn select(&mut self, id: WidgetId) -> Result<()> {
        if !self.contains(id) {
            return Err(LayoutError::NotFound(id));
        }
        for widget in &mut self.widgets {
            widget.selected = widget.id == id;
        }
        self.selection = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        for widget in &mut self.widgets {
            widget.selected = false;
        }
        self.selection = None;
    }

    /// Move a widget to the top (`to_front`) or bottom of the z-order.
    pub fn reorder(&mut self, id: WidgetId, to_front: bool) -> Result<()> {
        let index = self.index_of(id).ok_or(LayoutError::NotFound(id))?;
        let widget = self.widgets.remove(index);
        if to_front {
            self.widgets.push(widget);
        } else {
            self.widgets.insert(0, widget);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::is_aligned;

    fn doc() -> LayoutDocument {
        LayoutDocument::new(20)
    }

    #[test]
    fn create_snaps_and_applies_defaults() {
        let mut doc = doc();
        let w = doc.create_widget(WidgetKind::Button, 23, 57).clone();
        assert_eq!(w.position, Point::new(20, 60));
        assert_eq!(w.property("text"), Some("Button"));
        assert_eq!(w.document, doc.id());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn create_appends_on_top() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        let b = doc.create_widget(WidgetKind::Label, 0, 0).id;
        assert_eq!(doc.widgets()[0].id, a);
        assert_eq!(doc.widgets()[1].id, b);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        doc.delete_widget(a).unwrap();
        let b = doc.create_widget(WidgetKind::Button, 0, 0).id;
        assert_ne!(a, b);
    }

    #[test]
    fn delete_clears_selection() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        doc.select(a).unwrap();
        let (removed, index) = doc.delete_widget(a).unwrap();
        assert_eq!(index, 0);
        assert!(!removed.selected);
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut doc = doc();
        assert!(matches!(
            doc.delete_widget(WidgetId::new(99)),
            Err(LayoutError::NotFound(_))
        ));
    }

    #[test]
    fn move_snaps_target() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Entry, 0, 0).id;
        let previous = doc.move_widget(a, 71, 49).unwrap();
        assert_eq!(previous, Point::ORIGIN);
        let pos = doc.get(a).unwrap().position;
        assert_eq!(pos, Point::new(80, 40));
        assert!(is_aligned(pos.x, 20) && is_aligned(pos.y, 20));
    }

    #[test]
    fn invalid_property_is_skipped() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        assert!(!doc.set_property(a, "show", "*").unwrap());
        assert_eq!(doc.get(a).unwrap().property("show"), None);
        assert!(doc.set_property(a, "text", "OK").unwrap());
        assert_eq!(doc.get(a).unwrap().property("text"), Some("OK"));
    }

    #[test]
    fn set_property_on_missing_widget_fails() {
        let mut doc = doc();
        assert!(matches!(
            doc.set_property(WidgetId::new(5), "text", "x"),
            Err(LayoutError::NotFound(_))
        ));
    }

    #[test]
    fn single_selection() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        let b = doc.create_widget(WidgetKind::Label, 0, 0).id;
        doc.select(a).unwrap();
        doc.select(b).unwrap();
        let selected: Vec<_> = doc.widgets().iter().filter(|w| w.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, b);
        assert_eq!(doc.selection(), Some(b));

        doc.clear_selection();
        assert!(doc.widgets().iter().all(|w| !w.selected));
        assert_eq!(doc.selection(), None);
    }

    #[test]
    fn select_missing_keeps_selection() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        doc.select(a).unwrap();
        assert!(doc.select(WidgetId::new(42)).is_err());
        assert_eq!(doc.selection(), Some(a));
    }

    #[test]
    fn reorder_front_and_back() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).id;
        let b = doc.create_widget(WidgetKind::Label, 0, 0).id;
        let c = doc.create_widget(WidgetKind::Entry, 0, 0).id;

        doc.reorder(a, true).unwrap();
        let order: Vec<_> = doc.widgets().iter().map(|w| w.id).collect();
        assert_eq!(order, vec![b, c, a]);

        doc.reorder(c, false).unwrap();
        let order: Vec<_> = doc.widgets().iter().map(|w| w.id).collect();
        assert_eq!(order, vec![c, b, a]);
    }

    #[test]
    fn insert_rejects_duplicates_and_clamps_index() {
        let mut doc = doc();
        let a = doc.create_widget(WidgetKind::Button, 0, 0).clone();
        assert!(matches!(
            doc.insert_widget(a.clone(), None),
            Err(LayoutError::DuplicateWidget(_))
        ));

        let (removed, _) = doc.delete_widget(a.id).unwrap();
        doc.insert_widget(removed, Some(50)).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn insert_keeps_allocator_ahead() {
        let mut doc = doc();
        let mut other = LayoutDocument::new(20);
        let foreign = other.prepare_widget(WidgetKind::Label, 0, 0);
        let foreign = PlacedWidget {
            id: WidgetId::new(10),
            ..foreign
        };
        doc.insert_widget(foreign, None).unwrap();
        assert_eq!(doc.widgets()[0].document, doc.id());
        let next = doc.create_widget(WidgetKind::Button, 0, 0).id;
        assert!(next.get() > 10);
    }

    #[test]
    fn same_content_ignores_document_handle() {
        let mut a = doc();
        let mut b = doc();
        a.create_widget(WidgetKind::Button, 20, 20);
        b.create_widget(WidgetKind::Button, 20, 20);
        assert!(a.same_content(&b));
        b.move_widget(WidgetId::new(1), 40, 40).unwrap();
        assert!(!a.same_content(&b));
    }
}

//! Selection and gesture state machine.
//!
//! Tracks the active selection set and the single in-flight gesture (drag or
//! resize). Pointer deltas are always computed against the gesture-start
//! pointer position and the gesture-start geometries, never accumulated
//! incrementally, so rounding errors cannot drift a field over a long drag.
//!
//! The controller owns no field data: it captures start geometries when a
//! gesture begins and hands back `(id, geometry)` mutations for the caller
//! to write into the `FieldStore`.

use std::collections::BTreeSet;

use crate::error::CoreError;
use crate::geometry::{
    self, FieldGeometry, ResizeHandle, apply_move, apply_resize, pixel_delta_to_percent,
};
use crate::model::field::Field;

/// Pointer position in pixels, relative to the page container.
pub type PointPx = (f64, f64);

enum Gesture {
    Idle,
    Dragging {
        start: PointPx,
        origins: Vec<(String, FieldGeometry)>,
    },
    Resizing {
        id: String,
        handle: ResizeHandle,
        start: PointPx,
        origin: FieldGeometry,
    },
}

pub struct SelectionController {
    selected: BTreeSet<String>,
    gesture: Gesture,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            selected: BTreeSet::new(),
            gesture: Gesture::Idle,
        }
    }

    pub fn selected(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// The sole selected field, when the selection is a singleton. Resize
    /// handles are only rendered in that case.
    pub fn single_selection(&self) -> Option<&str> {
        if self.selected.len() == 1 {
            self.selected.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Gesture::Dragging { .. })
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self.gesture, Gesture::Resizing { .. })
    }

    pub fn gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// Pointer-down on a field body.
    ///
    /// Plain click on an unselected field replaces the selection; a modifier
    /// click toggles membership; a plain click on an already-selected field
    /// keeps the multi-selection intact so the whole group can be dragged.
    /// If the field ends up selected, a drag begins, capturing the start
    /// geometry of every selected field.
    pub fn pointer_down_on_field(
        &mut self,
        id: &str,
        extend: bool,
        at: PointPx,
        fields: &[Field],
    ) {
        if extend {
            if !self.selected.remove(id) {
                self.selected.insert(id.to_string());
            }
        } else if !self.selected.contains(id) {
            self.selected.clear();
            self.selected.insert(id.to_string());
        }

        if self.selected.contains(id) {
            let origins = fields
                .iter()
                .filter(|f| self.selected.contains(f.id()))
                .map(|f| (f.id().to_string(), f.geometry()))
                .collect();
            self.gesture = Gesture::Dragging { start: at, origins };
        } else {
            self.gesture = Gesture::Idle;
        }
    }

    /// Pointer-down on a resize handle. Forces the selection down to the
    /// single target field and cancels any drag in progress.
    pub fn begin_resize(
        &mut self,
        id: &str,
        handle: ResizeHandle,
        at: PointPx,
        origin: FieldGeometry,
    ) {
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.gesture = Gesture::Resizing {
            id: id.to_string(),
            handle,
            start: at,
            origin,
        };
    }

    /// Pointer-move during a gesture. Returns the full geometry each affected
    /// field should take, computed from the gesture-start snapshot. Idle
    /// pointer moves yield nothing.
    pub fn pointer_move(
        &self,
        at: PointPx,
        container_w_px: f64,
        container_h_px: f64,
    ) -> Result<Vec<(String, FieldGeometry)>, CoreError> {
        match &self.gesture {
            Gesture::Idle => Ok(Vec::new()),
            Gesture::Dragging { start, origins } => {
                let (dx, dy) = pixel_delta_to_percent(
                    at.0 - start.0,
                    at.1 - start.1,
                    container_w_px,
                    container_h_px,
                )?;
                Ok(origins
                    .iter()
                    .map(|(id, origin)| (id.clone(), apply_move(*origin, dx, dy)))
                    .collect())
            }
            Gesture::Resizing {
                id,
                handle,
                start,
                origin,
            } => {
                let (dx, dy) = pixel_delta_to_percent(
                    at.0 - start.0,
                    at.1 - start.1,
                    container_w_px,
                    container_h_px,
                )?;
                Ok(vec![(id.clone(), apply_resize(*origin, *handle, dx, dy))])
            }
        }
    }

    /// Pointer-up ends whatever gesture was active. Returns clamp mutations
    /// pulling dragged fields back to at least partial visibility.
    pub fn pointer_up(&mut self, fields: &[Field]) -> Vec<(String, FieldGeometry)> {
        let was_dragging = self.is_dragging();
        self.gesture = Gesture::Idle;
        if !was_dragging {
            return Vec::new();
        }
        fields
            .iter()
            .filter(|f| self.selected.contains(f.id()))
            .filter_map(|f| {
                let clamped = geometry::clamp_visible(f.geometry());
                (clamped != f.geometry()).then(|| (f.id().to_string(), clamped))
            })
            .collect()
    }

    /// Selects exactly one field without starting a gesture, as when a
    /// freshly placed field becomes the active one.
    pub fn select_only(&mut self, id: &str) {
        self.selected.clear();
        self.selected.insert(id.to_string());
        self.gesture = Gesture::Idle;
    }

    /// Click on empty canvas: clear everything.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.gesture = Gesture::Idle;
    }

    /// A field was removed from the store; drop it from the selection.
    pub fn on_field_removed(&mut self, id: &str) {
        self.selected.remove(id);
    }

    /// Ids to delete when the user asks to remove the selection. Clears the
    /// selection set as a unit.
    pub fn take_selected(&mut self) -> Vec<String> {
        let ids = self.selected.iter().cloned().collect();
        self.selected.clear();
        self.gesture = Gesture::Idle;
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FieldGeometry, LOGICAL_PAGE_WIDTH};
    use crate::model::field::{TextField, TextStyle};

    fn field(id: &str, x: f64, y: f64) -> Field {
        Field::Text(TextField {
            id: id.into(),
            label: "Text Field".into(),
            page: 1,
            geometry: FieldGeometry::new(x, y, 20.0, 5.0),
            value: String::new(),
            style: TextStyle::default(),
            source: None,
        })
    }

    #[test]
    fn plain_click_replaces_selection() {
        let fields = vec![field("a", 10.0, 10.0), field("b", 40.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", false, (0.0, 0.0), &fields);
        assert_eq!(sel.selected().iter().collect::<Vec<_>>(), vec!["b"]);
        assert!(sel.is_dragging());
    }

    #[test]
    fn modifier_click_toggles_membership() {
        let fields = vec![field("a", 10.0, 10.0), field("b", 40.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        assert_eq!(sel.count(), 2);
        sel.pointer_up(&fields);
        // Toggling off a selected field must not start a drag for it.
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        assert_eq!(sel.selected().iter().collect::<Vec<_>>(), vec!["a"]);
        assert!(!sel.is_dragging());
    }

    #[test]
    fn plain_click_on_selected_field_keeps_group_for_drag() {
        let fields = vec![field("a", 10.0, 10.0), field("b", 40.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        assert_eq!(sel.count(), 2);
        assert!(sel.is_dragging());
    }

    #[test]
    fn drag_applies_total_delta_from_start_positions() {
        // 40px inside an 800px-wide container at scale 1 is +5 percent.
        let fields = vec![field("f1", 10.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("f1", false, (100.0, 100.0), &fields);

        // Intermediate moves must not accumulate: only the final total counts.
        let _ = sel
            .pointer_move((117.0, 100.0), LOGICAL_PAGE_WIDTH, 1132.0)
            .unwrap();
        let updates = sel
            .pointer_move((140.0, 100.0), LOGICAL_PAGE_WIDTH, 1132.0)
            .unwrap();
        assert_eq!(updates.len(), 1);
        let (id, g) = &updates[0];
        assert_eq!(id, "f1");
        assert!((g.x - 15.0).abs() < 1e-9);
        assert_eq!(g.y, 10.0);
    }

    #[test]
    fn group_drag_moves_every_selected_field() {
        let fields = vec![field("a", 10.0, 10.0), field("b", 40.0, 30.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);

        let updates = sel.pointer_move((80.0, 0.0), 800.0, 1000.0).unwrap();
        assert_eq!(updates.len(), 2);
        for (id, g) in &updates {
            let origin = if id == "a" { 10.0 } else { 40.0 };
            assert!((g.x - (origin + 10.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn starting_a_resize_collapses_the_selection() {
        let fields = vec![
            field("a", 10.0, 10.0),
            field("b", 40.0, 10.0),
            field("f", 70.0, 10.0),
        ];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("f", true, (0.0, 0.0), &fields);

        // Grabbing a handle on f while {a, b, f} are selected (and a drag is
        // technically active) cancels the drag and selects exactly {f}.
        sel.begin_resize("f", ResizeHandle::Se, (0.0, 0.0), fields[2].geometry());
        assert_eq!(sel.selected().iter().collect::<Vec<_>>(), vec!["f"]);
        assert!(sel.is_resizing());
        assert!(!sel.is_dragging());
    }

    #[test]
    fn resize_move_targets_the_single_field() {
        let fields = vec![field("f", 10.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.begin_resize("f", ResizeHandle::E, (0.0, 0.0), fields[0].geometry());
        let updates = sel.pointer_move((16.0, 0.0), 800.0, 1000.0).unwrap();
        assert_eq!(updates.len(), 1);
        assert!((updates[0].1.w - 22.0).abs() < 1e-9);
    }

    #[test]
    fn pointer_up_returns_to_idle_and_clamps_offpage_fields() {
        let mut offpage = field("f", 10.0, 10.0);
        offpage.set_geometry(FieldGeometry::new(-50.0, 10.0, 20.0, 5.0));
        let fields = vec![offpage];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("f", false, (0.0, 0.0), &fields);
        let clamps = sel.pointer_up(&fields);
        assert!(!sel.gesture_active());
        assert_eq!(clamps.len(), 1);
        assert_eq!(clamps[0].1.x, -19.0);
    }

    #[test]
    fn deleting_selected_fields_clears_the_set() {
        let fields = vec![field("a", 10.0, 10.0), field("b", 40.0, 10.0)];
        let mut sel = SelectionController::new();
        sel.pointer_down_on_field("a", false, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);
        sel.pointer_down_on_field("b", true, (0.0, 0.0), &fields);
        sel.pointer_up(&fields);

        let doomed = sel.take_selected();
        assert_eq!(doomed, vec!["a", "b"]);
        assert_eq!(sel.count(), 0);
    }

    #[test]
    fn idle_pointer_move_yields_nothing() {
        let sel = SelectionController::new();
        assert!(sel.pointer_move((50.0, 50.0), 800.0, 1000.0).unwrap().is_empty());
    }
}

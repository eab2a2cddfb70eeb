//! History-backed element store: the single source of truth for the canvas.
//!
//! Every structural mutation (add/update/remove/reorder/clear/bulk replace)
//! records the pre-mutation element array on the undo stack and clears the
//! redo stack. Hydration (`load_elements`), canvas sizing, and selection are
//! history-neutral. All operations are permissive: unknown ids are silent
//! no-ops, never errors.

use crate::element::{Element, ElementId, ElementPatch, PASTE_OFFSET};
use kurbo::{Point, Size, Vec2};

/// Default canvas size for new stores.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(800.0, 600.0);

/// The element collection, selection, canvas size, and undo/redo stacks.
#[derive(Debug, Clone)]
pub struct ElementStore {
    elements: Vec<Element>,
    selected: Option<ElementId>,
    canvas_size: Size,
    /// Older snapshots, oldest first.
    past: Vec<Vec<Element>>,
    /// Undone snapshots, next redo first.
    future: Vec<Vec<Element>>,
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementStore {
    /// Create an empty store with the default canvas size.
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            selected: None,
            canvas_size: DEFAULT_CANVAS_SIZE,
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    /// Record the current elements as an undo step and invalidate redo.
    fn push_history(&mut self) {
        self.past.push(self.elements.clone());
        self.future.clear();
    }

    /// Drop the selection if it no longer points at a live element.
    fn fix_selection(&mut self) {
        if let Some(id) = self.selected {
            if !self.elements.iter().any(|e| e.id == id) {
                self.selected = None;
            }
        }
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    // ---- structural mutations (history-pushing) ----

    /// Add an element, select it, and record history.
    ///
    /// Ids are taken as-is; uniqueness is the id generator's job, not this
    /// layer's.
    pub fn add(&mut self, mut element: Element) -> ElementId {
        self.push_history();
        element.opacity = element.opacity.clamp(0.0, 1.0);
        let id = element.id;
        log::debug!("add element {} ({})", id, element.kind);
        self.elements.push(element);
        self.selected = Some(id);
        id
    }

    /// Merge a partial patch into the element with the given id.
    ///
    /// Selection is untouched. An unknown id leaves the collection as-is but
    /// still records a history step (the matching undo restores an identical
    /// array); see DESIGN.md.
    pub fn update(&mut self, id: ElementId, patch: ElementPatch) {
        self.push_history();
        match self.elements.iter_mut().find(|e| e.id == id) {
            Some(element) => patch.apply(element),
            None => log::warn!("update for unknown element {}", id),
        }
    }

    /// Remove an element. Clears the selection only when it pointed at the
    /// removed element.
    pub fn remove(&mut self, id: ElementId) {
        if self.index_of(id).is_none() {
            return;
        }
        self.push_history();
        self.elements.retain(|e| e.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Move an element to a new position in the array and renumber every
    /// element's `z_index` to its array index (dense, zero-based).
    ///
    /// Unknown ids and same-index moves are true no-ops with no history push.
    pub fn reorder(&mut self, id: ElementId, new_index: usize) {
        let Some(current) = self.index_of(id) else {
            return;
        };
        let new_index = new_index.min(self.elements.len() - 1);
        if new_index == current {
            return;
        }
        self.push_history();
        let element = self.elements.remove(current);
        self.elements.insert(new_index, element);
        self.renumber_z();
    }

    fn renumber_z(&mut self) {
        for (index, element) in self.elements.iter_mut().enumerate() {
            element.z_index = index as i32;
        }
    }

    /// Remove every element and clear the selection. The pre-clear array
    /// stays undoable.
    pub fn clear(&mut self) {
        self.push_history();
        self.elements.clear();
        self.selected = None;
    }

    /// Replace the whole collection in one undoable step.
    pub fn set_elements(&mut self, elements: Vec<Element>) {
        self.push_history();
        self.elements = elements;
        for element in &mut self.elements {
            element.opacity = element.opacity.clamp(0.0, 1.0);
        }
        self.fix_selection();
    }

    // ---- convenience wrappers over update ----

    /// Translate an element by a delta. Unknown ids return without
    /// dispatching an update (and without touching history).
    pub fn move_by(&mut self, id: ElementId, delta: Vec2) {
        let Some(position) = self.elements.iter().find(|e| e.id == id).map(|e| e.position) else {
            return;
        };
        self.update(id, ElementPatch::new().position(position + delta));
    }

    /// Set an element's absolute rotation in degrees.
    pub fn rotate(&mut self, id: ElementId, degrees: f64) {
        self.update(id, ElementPatch::new().rotation(degrees));
    }

    /// Set an element's absolute size.
    pub fn resize(&mut self, id: ElementId, size: Size) {
        self.update(id, ElementPatch::new().size(size));
    }

    /// Set an element's absolute stacking index.
    pub fn set_z_index(&mut self, id: ElementId, z_index: i32) {
        self.update(id, ElementPatch::new().z_index(z_index));
    }

    // ---- stacking shortcuts ----

    pub fn bring_to_front(&mut self, id: ElementId) {
        if !self.elements.is_empty() {
            self.reorder(id, self.elements.len() - 1);
        }
    }

    pub fn send_to_back(&mut self, id: ElementId) {
        self.reorder(id, 0);
    }

    pub fn bring_forward(&mut self, id: ElementId) {
        if let Some(index) = self.index_of(id) {
            self.reorder(id, index + 1);
        }
    }

    pub fn send_backward(&mut self, id: ElementId) {
        if let Some(index) = self.index_of(id) {
            self.reorder(id, index.saturating_sub(1));
        }
    }

    // ---- clipboard-style operations ----

    /// Clone an element (the given id, or the selection) with a fresh id,
    /// offset it, stack it on top, and select it. Returns the clone's id, or
    /// `None` when no target resolves.
    pub fn duplicate(&mut self, target: Option<ElementId>, offset: Option<Vec2>) -> Option<ElementId> {
        let id = target.or(self.selected)?;
        let source = self.elements.iter().find(|e| e.id == id)?.clone();
        Some(self.insert_clone(source, offset.unwrap_or(PASTE_OFFSET)))
    }

    /// Owned copy of an element for an external clipboard. No mutation.
    pub fn copy(&self, target: Option<ElementId>) -> Option<Element> {
        let id = target.or(self.selected)?;
        self.elements.iter().find(|e| e.id == id).cloned()
    }

    /// Insert a copied element from an external clipboard. A `None` source is
    /// a silent no-op.
    pub fn paste(&mut self, source: Option<&Element>, offset: Option<Vec2>) -> Option<ElementId> {
        let source = source?.clone();
        Some(self.insert_clone(source, offset.unwrap_or(PASTE_OFFSET)))
    }

    fn insert_clone(&mut self, mut element: Element, offset: Vec2) -> ElementId {
        element.regenerate_id();
        element.position += offset;
        element.z_index = self.elements.iter().map(|e| e.z_index).max().unwrap_or(0).max(0) + 1;
        self.add(element)
    }

    // ---- hydration and history control ----

    /// Replace the collection without recording history. Used for initial
    /// hydration so undo never reaches an artificial empty state.
    pub fn load_elements(&mut self, elements: Vec<Element>) {
        log::debug!("hydrate {} elements", elements.len());
        self.elements = elements;
        for element in &mut self.elements {
            element.opacity = element.opacity.clamp(0.0, 1.0);
        }
        self.fix_selection();
    }

    /// Restore the previous snapshot. Returns false, with the state
    /// untouched, when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.future.insert(0, current);
        self.fix_selection();
        true
    }

    /// Re-apply the most recently undone snapshot. Mirror of [`Self::undo`].
    pub fn redo(&mut self) -> bool {
        if self.future.is_empty() {
            return false;
        }
        let snapshot = self.future.remove(0);
        let current = std::mem::replace(&mut self.elements, snapshot);
        self.past.push(current);
        self.fix_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Drop both history stacks, leaving the current elements untouched.
    pub fn clear_history(&mut self) {
        self.past = Vec::new();
        self.future = Vec::new();
    }

    // ---- selection and canvas ----

    /// Select an element. Ids not present in the collection are ignored, so
    /// the selection always references a live element.
    pub fn select(&mut self, id: ElementId) {
        if self.index_of(id).is_some() {
            self.selected = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&Element> {
        let id = self.selected?;
        self.elements.iter().find(|e| e.id == id)
    }

    /// Resize the canvas. History-neutral. Non-positive dimensions are
    /// ignored.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            log::warn!("ignoring non-positive canvas size {}x{}", width, height);
            return;
        }
        self.canvas_size = Size::new(width, height);
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    // ---- queries ----

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in draw order (ascending `z_index`, ties in array order).
    pub fn elements_ordered(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.z_index);
        ordered
    }

    /// Ids of elements under a point, front to back. Hidden and locked
    /// elements are skipped, matching what is selectable.
    pub fn elements_at_point(&self, probe: Point, tolerance: f64) -> Vec<ElementId> {
        let mut hits: Vec<&Element> = self
            .elements
            .iter()
            .filter(|e| e.visible && !e.locked && e.hit_test(probe, tolerance))
            .collect();
        hits.sort_by_key(|e| std::cmp::Reverse(e.z_index));
        hits.into_iter().map(|e| e.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shape(x: f64, y: f64) -> Element {
        Element::new("shape").with_position(x, y).with_size(100.0, 50.0)
    }

    #[test]
    fn test_add_selects_and_records_history() {
        let mut store = ElementStore::new();
        let id = store.add(shape(0.0, 0.0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.selected(), Some(id));
        assert!(store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_update_merges_patch() {
        let mut store = ElementStore::new();
        let id = store.add(shape(0.0, 0.0));
        store.update(id, ElementPatch::new().position(Point::new(40.0, 50.0)));

        let element = store.get(id).unwrap();
        assert_eq!(element.position, Point::new(40.0, 50.0));
        assert_eq!(element.size, Size::new(100.0, 50.0));
    }

    #[test]
    fn test_update_unknown_id_still_records_history() {
        // A failed update still burns an undo slot; undoing it restores an
        // identical array. See DESIGN.md.
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0)]);
        assert!(!store.can_undo());

        store.update(ElementId::new_v4(), ElementPatch::new().rotation(45.0));

        assert!(store.can_undo());
        let before = store.elements().to_vec();
        assert!(store.undo());
        assert_eq!(store.elements(), &before[..]);
    }

    #[test]
    fn test_remove_clears_only_matching_selection() {
        let mut store = ElementStore::new();
        let a = store.add(shape(0.0, 0.0));
        let b = store.add(shape(10.0, 10.0));

        store.select(a);
        store.remove(b);
        assert_eq!(store.selected(), Some(a));

        store.remove(a);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0)]);
        store.remove(ElementId::new_v4());
        assert_eq!(store.len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_reorder_renumbers_z_densely() {
        let mut store = ElementStore::new();
        let a = store.add(shape(0.0, 0.0).with_z_index(7));
        let b = store.add(shape(10.0, 10.0).with_z_index(3));
        let c = store.add(shape(20.0, 20.0).with_z_index(11));

        store.reorder(c, 0);

        let ids: Vec<ElementId> = store.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, a, b]);
        let zs: Vec<i32> = store.elements().iter().map(|e| e.z_index).collect();
        assert_eq!(zs, vec![0, 1, 2]);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let mut store = ElementStore::new();
        let a = store.add(shape(0.0, 0.0));
        store.add(shape(10.0, 10.0));
        store.clear_history();

        store.reorder(a, 0);

        assert!(!store.can_undo());
        assert_eq!(store.elements()[0].id, a);
    }

    #[test]
    fn test_reorder_unknown_id_is_noop() {
        let mut store = ElementStore::new();
        store.add(shape(0.0, 0.0));
        store.clear_history();
        store.reorder(ElementId::new_v4(), 0);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_stacking_shortcuts() {
        let mut store = ElementStore::new();
        let a = store.add(shape(0.0, 0.0));
        let b = store.add(shape(10.0, 10.0));
        let c = store.add(shape(20.0, 20.0));

        store.send_to_back(c);
        let ids: Vec<ElementId> = store.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, a, b]);

        store.bring_to_front(a);
        let ids: Vec<ElementId> = store.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, b, a]);

        store.bring_forward(c);
        let ids: Vec<ElementId> = store.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b, c, a]);

        store.send_backward(c);
        let ids: Vec<ElementId> = store.elements().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c, b, a]);
    }

    #[test]
    fn test_move_by_unknown_id_skips_history() {
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0)]);
        store.move_by(ElementId::new_v4(), Vec2::new(5.0, 5.0));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_move_rotate_resize_wrappers() {
        let mut store = ElementStore::new();
        let id = store.add(shape(10.0, 20.0));

        store.move_by(id, Vec2::new(5.0, -5.0));
        store.rotate(id, 90.0);
        store.resize(id, Size::new(40.0, 30.0));
        store.set_z_index(id, 9);

        let element = store.get(id).unwrap();
        assert_eq!(element.position, Point::new(15.0, 15.0));
        assert_eq!(element.rotation, 90.0);
        assert_eq!(element.size, Size::new(40.0, 30.0));
        assert_eq!(element.z_index, 9);
    }

    #[test]
    fn test_duplicate_offsets_and_stacks_on_top() {
        let mut store = ElementStore::new();
        store.add(shape(0.0, 0.0).with_z_index(1));
        let id = store.add(shape(100.0, 200.0).with_z_index(4));

        let dup = store.duplicate(Some(id), None).unwrap();

        assert_ne!(dup, id);
        assert_eq!(store.selected(), Some(dup));
        let clone = store.get(dup).unwrap();
        assert_eq!(clone.position, Point::new(120.0, 220.0));
        assert_eq!(clone.z_index, 5);
        // The source is untouched.
        assert_eq!(store.get(id).unwrap().position, Point::new(100.0, 200.0));
    }

    #[test]
    fn test_duplicate_falls_back_to_selection() {
        let mut store = ElementStore::new();
        let id = store.add(shape(50.0, 50.0));
        assert_eq!(store.selected(), Some(id));

        let dup = store.duplicate(None, Some(Vec2::new(1.0, 2.0))).unwrap();
        assert_eq!(store.get(dup).unwrap().position, Point::new(51.0, 52.0));
    }

    #[test]
    fn test_duplicate_without_target_is_noop() {
        let mut store = ElementStore::new();
        assert_eq!(store.duplicate(None, None), None);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_copy_does_not_mutate() {
        let mut store = ElementStore::new();
        let id = store.add(shape(10.0, 10.0));
        store.clear_history();

        let copied = store.copy(Some(id)).unwrap();
        assert_eq!(copied.id, id);
        assert_eq!(store.len(), 1);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_paste_assigns_fresh_id_and_offset() {
        let mut store = ElementStore::new();
        let id = store.add(shape(10.0, 10.0).with_z_index(2));
        let copied = store.copy(Some(id)).unwrap();
        store.remove(id);

        let pasted = store.paste(Some(&copied), None).unwrap();
        assert_ne!(pasted, id);
        let element = store.get(pasted).unwrap();
        assert_eq!(element.position, Point::new(30.0, 30.0));
        assert_eq!(element.z_index, 1);
    }

    #[test]
    fn test_paste_none_is_noop() {
        let mut store = ElementStore::new();
        assert_eq!(store.paste(None, None), None);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_undo_restores_removed_element_and_keeps_added() {
        let mut store = ElementStore::new();
        let kept = shape(0.0, 0.0);
        let kept_id = kept.id;
        store.load_elements(vec![kept]);

        let added = store.add(shape(10.0, 10.0));
        store.remove(kept_id);
        assert_eq!(store.len(), 1);

        assert!(store.undo());
        assert!(store.get(kept_id).is_some());
        assert!(store.get(added).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_history_round_trip() {
        let mut store = ElementStore::new();
        let seed = shape(0.0, 0.0);
        store.load_elements(vec![seed.clone()]);
        let initial = store.elements().to_vec();

        let added = store.add(shape(10.0, 10.0));
        store.update(added, ElementPatch::new().rotation(15.0));
        store.remove(seed.id);
        store.reorder(added, 0);
        store.clear();
        let final_state = store.elements().to_vec();
        // reorder of the sole remaining element to index 0 was a no-op, so
        // four snapshots were recorded.
        for _ in 0..4 {
            assert!(store.undo());
        }
        assert_eq!(store.elements(), &initial[..]);
        assert!(!store.can_undo());

        for _ in 0..4 {
            assert!(store.redo());
        }
        assert_eq!(store.elements(), &final_state[..]);
        assert!(!store.can_redo());
    }

    #[test]
    fn test_undo_redo_on_empty_stacks_are_noops() {
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0)]);
        let before = store.elements().to_vec();

        assert!(!store.undo());
        assert!(!store.redo());
        assert_eq!(store.elements(), &before[..]);
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut store = ElementStore::new();
        store.add(shape(0.0, 0.0));
        assert!(store.undo());
        assert!(store.can_redo());

        store.add(shape(10.0, 10.0));
        assert!(!store.can_redo());
    }

    #[test]
    fn test_load_elements_bypasses_history() {
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0), shape(10.0, 10.0)]);

        assert_eq!(store.len(), 2);
        assert!(!store.can_undo());
        // Undo never reaches an artificial empty canvas.
        assert!(!store.undo());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_elements_is_undoable() {
        let mut store = ElementStore::new();
        store.load_elements(vec![shape(0.0, 0.0)]);
        let before = store.elements().to_vec();

        store.set_elements(vec![shape(5.0, 5.0), shape(6.0, 6.0)]);
        assert_eq!(store.len(), 2);

        assert!(store.undo());
        assert_eq!(store.elements(), &before[..]);
    }

    #[test]
    fn test_undo_of_add_drops_dangling_selection() {
        let mut store = ElementStore::new();
        let id = store.add(shape(0.0, 0.0));
        assert_eq!(store.selected(), Some(id));

        assert!(store.undo());
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_clear_history_keeps_elements() {
        let mut store = ElementStore::new();
        store.add(shape(0.0, 0.0));
        store.add(shape(10.0, 10.0));
        assert!(store.undo());

        store.clear_history();

        assert_eq!(store.len(), 1);
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn test_select_unknown_id_is_ignored() {
        let mut store = ElementStore::new();
        let id = store.add(shape(0.0, 0.0));
        store.select(ElementId::new_v4());
        assert_eq!(store.selected(), Some(id));
    }

    #[test]
    fn test_set_canvas_size() {
        let mut store = ElementStore::new();
        assert_eq!(store.canvas_size(), DEFAULT_CANVAS_SIZE);

        store.set_canvas_size(1024.0, 768.0);
        assert_eq!(store.canvas_size(), Size::new(1024.0, 768.0));
        assert!(!store.can_undo());

        store.set_canvas_size(0.0, 768.0);
        assert_eq!(store.canvas_size(), Size::new(1024.0, 768.0));
    }

    #[test]
    fn test_add_clamps_opacity() {
        let mut store = ElementStore::new();
        let id = store.add(Element::new("shape").with_prop("fill", json!("#fff")).with_z_index(0));
        assert_eq!(store.get(id).unwrap().opacity, 1.0);

        let mut wild = Element::new("shape");
        wild.opacity = 3.5;
        let id = store.add(wild);
        assert_eq!(store.get(id).unwrap().opacity, 1.0);
    }

    #[test]
    fn test_elements_ordered_sorts_by_z() {
        let mut store = ElementStore::new();
        let a = store.add(shape(0.0, 0.0).with_z_index(5));
        let b = store.add(shape(10.0, 10.0).with_z_index(1));

        let ordered: Vec<ElementId> = store.elements_ordered().iter().map(|e| e.id).collect();
        assert_eq!(ordered, vec![b, a]);
    }

    #[test]
    fn test_elements_at_point_front_to_back() {
        let mut store = ElementStore::new();
        let back = store.add(shape(0.0, 0.0).with_z_index(0));
        let front = store.add(shape(50.0, 25.0).with_z_index(1));
        let hidden = store.add(shape(50.0, 25.0).with_z_index(2).with_visible(false));
        let locked = store.add(shape(50.0, 25.0).with_z_index(3).with_locked(true));

        let hits = store.elements_at_point(Point::new(60.0, 30.0), 0.0);
        assert_eq!(hits, vec![front, back]);
        assert!(!hits.contains(&hidden));
        assert!(!hits.contains(&locked));
    }
}

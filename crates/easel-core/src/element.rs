//! Element data model for the canvas.

use crate::geometry;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Default offset applied when duplicating or pasting an element.
pub const PASTE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// A single element on the canvas.
///
/// `position` is the top-left, pre-rotation anchor; `rotation` is in degrees
/// and pivots around that anchor. The `props` bag is type-specific payload
/// that the core stores and round-trips but never interprets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, generated fresh on creation, duplicate, and paste.
    pub id: ElementId,
    /// Type discriminator. Selects a renderer and a property schema in the
    /// host layer.
    #[serde(rename = "type")]
    pub kind: String,
    /// Top-left anchor, before rotation is applied.
    pub position: Point,
    /// Width and height of the unrotated box.
    pub size: Size,
    /// Rotation in degrees around the position anchor.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Stacking order. Dense and zero-based after any reorder.
    pub z_index: i32,
    /// Hidden elements are neither drawn nor used as snap targets.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Locked elements are excluded from drag and selection but still act as
    /// snap targets while visible.
    #[serde(default)]
    pub locked: bool,
    /// Opaque type-specific payload.
    pub props: Map<String, Value>,
}

fn default_opacity() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Element {
    /// Create a new element of the given kind with a fresh id.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            position: Point::ZERO,
            size: Size::new(100.0, 100.0),
            rotation: 0.0,
            opacity: 1.0,
            z_index: 0,
            visible: true,
            locked: false,
            props: Map::new(),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }

    /// Rotation-aware bounding box at the element's stored position.
    pub fn bounds(&self) -> Rect {
        geometry::bounding_box(self.position, self.size, self.rotation)
    }

    /// True rotated center (not the bounding-box center).
    pub fn center(&self) -> Point {
        geometry::rotated_center(self.position, self.size, self.rotation)
    }

    /// Check if a point (in canvas coordinates) hits this element.
    pub fn hit_test(&self, probe: Point, tolerance: f64) -> bool {
        geometry::hit_test(self.position, self.size, self.rotation, probe, tolerance)
    }

    /// Assign a fresh id. Used when duplicating or pasting so ids are never
    /// reused.
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }
}

/// Partial update applied through [`crate::store::ElementStore::update`].
///
/// Merging is field-level: a present field replaces the element's value
/// wholesale. `props` in particular is swapped as a unit, never deep-merged;
/// callers pass the whole bag when any key changes.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub kind: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub rotation: Option<f64>,
    pub opacity: Option<f64>,
    pub z_index: Option<i32>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub props: Option<Map<String, Value>>,
}

impl ElementPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    pub fn props(mut self, props: Map<String, Value>) -> Self {
        self.props = Some(props);
        self
    }

    /// Merge this patch into an element.
    pub fn apply(&self, element: &mut Element) {
        if let Some(kind) = &self.kind {
            element.kind = kind.clone();
        }
        if let Some(position) = self.position {
            element.position = position;
        }
        if let Some(size) = self.size {
            element.size = size;
        }
        if let Some(rotation) = self.rotation {
            element.rotation = rotation;
        }
        if let Some(opacity) = self.opacity {
            element.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(z_index) = self.z_index {
            element.z_index = z_index;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(props) = &self.props {
            element.props = props.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_element_defaults() {
        let element = Element::new("text");
        assert_eq!(element.kind, "text");
        assert!(element.visible);
        assert!(!element.locked);
        assert_eq!(element.opacity, 1.0);
        assert_eq!(element.rotation, 0.0);
        assert!(element.props.is_empty());
    }

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = Element::new("text");
        let b = Element::new("text");
        assert_ne!(a.id, b.id);

        let mut c = a.clone();
        c.regenerate_id();
        assert_ne!(a.id, c.id);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut element = Element::new("image")
            .with_position(10.0, 20.0)
            .with_size(50.0, 60.0)
            .with_rotation(30.0);

        ElementPatch::new()
            .position(Point::new(100.0, 200.0))
            .apply(&mut element);

        assert_eq!(element.position, Point::new(100.0, 200.0));
        assert_eq!(element.size, Size::new(50.0, 60.0));
        assert_eq!(element.rotation, 30.0);
    }

    #[test]
    fn test_patch_replaces_props_whole() {
        let mut element = Element::new("text").with_prop("content", json!("hello"));

        let mut props = Map::new();
        props.insert("fontSize".to_string(), json!(24));
        ElementPatch::new().props(props).apply(&mut element);

        // The old key is gone: the bag is swapped, not merged.
        assert!(element.props.get("content").is_none());
        assert_eq!(element.props.get("fontSize"), Some(&json!(24)));
    }

    #[test]
    fn test_patch_clamps_opacity() {
        let mut element = Element::new("text");
        ElementPatch::new().opacity(1.8).apply(&mut element);
        assert_eq!(element.opacity, 1.0);
        ElementPatch::new().opacity(-0.5).apply(&mut element);
        assert_eq!(element.opacity, 0.0);
    }

    #[test]
    fn test_missing_flags_default_on_deserialize() {
        let json = r#"{
            "id": "4f2c8a44-9af5-4d2b-8f5e-0d6f4b6c9e01",
            "type": "text",
            "position": {"x": 1.0, "y": 2.0},
            "size": {"width": 10.0, "height": 20.0},
            "rotation": 0.0,
            "zIndex": 0,
            "props": {}
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(element.visible);
        assert!(!element.locked);
        assert_eq!(element.opacity, 1.0);
    }

    #[test]
    fn test_bounds_uses_anchor_pivot() {
        let element = Element::new("shape")
            .with_position(200.0, 100.0)
            .with_size(100.0, 100.0)
            .with_rotation(90.0);
        let bounds = element.bounds();
        assert!((bounds.x0 - 100.0).abs() < 1e-9);
        assert!((bounds.x1 - 200.0).abs() < 1e-9);
        assert!((element.center().x - 150.0).abs() < 1e-9);
        assert!((element.center().y - 150.0).abs() < 1e-9);
    }
}

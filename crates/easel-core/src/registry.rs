//! Element type registry: property schemas for the inspector layer.
//!
//! The registry is an owned instance handed to whatever needs type lookups,
//! never process-global state, so two editors in one process keep independent
//! type sets. The core stores and round-trips `props` without validating them
//! against these schemas; enforcement belongs to the inspector.

use crate::element::Element;
use kurbo::Size;
use std::collections::HashMap;

/// Value shape of an inspectable property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Number { min: f64, max: f64, step: f64 },
    Text,
    Color,
    Toggle,
    Select { options: Vec<String> },
}

/// One inspector field of an element type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// Key into the element's `props` bag.
    pub name: String,
    /// Human-readable field label.
    pub label: String,
    pub kind: PropertyKind,
}

impl PropertySchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
        }
    }
}

/// A registered element type.
#[derive(Debug, Clone)]
pub struct ElementTypeDef {
    /// The `Element::kind` discriminator this definition describes.
    pub kind: String,
    pub display_name: String,
    pub default_size: Size,
    pub schemas: Vec<PropertySchema>,
}

/// Registry of element types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, ElementTypeDef>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the stock text/image/shape types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(ElementTypeDef {
            kind: "text".to_string(),
            display_name: "Text".to_string(),
            default_size: Size::new(200.0, 40.0),
            schemas: vec![
                PropertySchema::new("content", "Content", PropertyKind::Text),
                PropertySchema::new(
                    "fontSize",
                    "Font size",
                    PropertyKind::Number {
                        min: 6.0,
                        max: 200.0,
                        step: 1.0,
                    },
                ),
                PropertySchema::new("color", "Color", PropertyKind::Color),
            ],
        });
        registry.register(ElementTypeDef {
            kind: "image".to_string(),
            display_name: "Image".to_string(),
            default_size: Size::new(200.0, 150.0),
            schemas: vec![
                PropertySchema::new("src", "Source", PropertyKind::Text),
                PropertySchema::new(
                    "fit",
                    "Fit",
                    PropertyKind::Select {
                        options: vec![
                            "contain".to_string(),
                            "cover".to_string(),
                            "fill".to_string(),
                        ],
                    },
                ),
            ],
        });
        registry.register(ElementTypeDef {
            kind: "shape".to_string(),
            display_name: "Shape".to_string(),
            default_size: Size::new(100.0, 100.0),
            schemas: vec![
                PropertySchema::new("fill", "Fill", PropertyKind::Color),
                PropertySchema::new(
                    "cornerRadius",
                    "Corner radius",
                    PropertyKind::Number {
                        min: 0.0,
                        max: 100.0,
                        step: 1.0,
                    },
                ),
                PropertySchema::new("shadow", "Shadow", PropertyKind::Toggle),
            ],
        });
        registry
    }

    /// Register a type, replacing any previous definition of the same kind.
    pub fn register(&mut self, def: ElementTypeDef) {
        self.types.insert(def.kind.clone(), def);
    }

    pub fn get(&self, kind: &str) -> Option<&ElementTypeDef> {
        self.types.get(kind)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.types.contains_key(kind)
    }

    /// Registered kinds, sorted for stable toolbar/palette ordering.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.types.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build a default element of a registered kind, or `None` for an
    /// unregistered one.
    pub fn default_element(&self, kind: &str) -> Option<Element> {
        let def = self.get(kind)?;
        Some(Element::new(&def.kind).with_size(def.default_size.width, def.default_size.height))
    }
}

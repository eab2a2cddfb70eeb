//! Easel Core Library
//!
//! Platform-agnostic core for the Easel canvas editor: the element store with
//! undo/redo history, the drag-alignment snapping engine, and the JSON
//! document boundary. Rendering, input routing, and inspector UI live in host
//! crates and talk to this one through [`ElementStore`] and [`compute_snap`].

pub mod element;
pub mod geometry;
pub mod registry;
pub mod snap;
pub mod snapshot;
pub mod store;

pub use element::{Element, ElementId, ElementPatch, PASTE_OFFSET};
pub use registry::{ElementTypeDef, PropertyKind, PropertySchema, TypeRegistry};
pub use snap::{
    GuideKind, GuideOrientation, SnapGuide, SnapOptions, SnapResult, compute_snap, SNAP_THRESHOLD,
};
pub use snapshot::{Snapshot, SnapshotError};
pub use store::{ElementStore, DEFAULT_CANVAS_SIZE};

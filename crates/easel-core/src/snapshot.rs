//! JSON snapshot import/export: the document persistence boundary.
//!
//! A [`Snapshot`] is the only persisted form of a document. Import is
//! all-or-nothing: the payload is parsed and validated in full before any
//! store state changes, so a bad file can never leave the store half-applied.

use crate::element::Element;
use crate::store::ElementStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while importing a document snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
}

/// A serializable document: canvas size, elements, and optional metadata
/// (timestamps, version tags) that the core carries but never reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Snapshot {
    /// Parse and validate a snapshot. Nothing is applied on failure.
    ///
    /// Required element fields (id, type, position, size, rotation, zIndex,
    /// props) surface as parse errors naming the missing field; absent
    /// `visible`/`locked`/`opacity` flags are default-filled.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.width <= 0.0 || snapshot.height <= 0.0 {
            return Err(SnapshotError::InvalidCanvas {
                width: snapshot.width,
                height: snapshot.height,
            });
        }
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ElementStore {
    /// Produce a snapshot of the current document.
    pub fn export(&self, metadata: Option<Map<String, Value>>) -> Snapshot {
        let canvas = self.canvas_size();
        Snapshot {
            width: canvas.width,
            height: canvas.height,
            elements: self.elements().to_vec(),
            metadata,
        }
    }

    /// Hydrate the store from a validated snapshot.
    ///
    /// Bypasses history, like [`ElementStore::load_elements`], so importing a
    /// document does not leave an undo step back to the pre-import state.
    pub fn load_snapshot(&mut self, snapshot: Snapshot) {
        self.set_canvas_size(snapshot.width, snapshot.height);
        self.load_elements(snapshot.elements);
    }

    /// Parse, validate, and hydrate in one step. The store is untouched when
    /// the payload is rejected.
    pub fn import_json(&mut self, json: &str) -> Result<(), SnapshotError> {
        let snapshot = Snapshot::from_json(json)?;
        self.load_snapshot(snapshot);
        Ok(())
    }

    pub fn export_json(&self, metadata: Option<Map<String, Value>>) -> Result<String, serde_json::Error> {
        self.export(metadata).to_json()
    }
}

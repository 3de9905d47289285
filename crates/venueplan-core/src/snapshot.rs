//! Project snapshots: the serialized form handed to the project store.

use crate::canvas::{CanvasState, PlacedItem};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Canvas size as stored in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl From<Size> for CanvasSize {
    fn from(size: Size) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl From<CanvasSize> for Size {
    fn from(size: CanvasSize) -> Self {
        Size::new(size.width, size.height)
    }
}

/// Items plus canvas size, as persisted by the project store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    #[serde(default)]
    pub items: Vec<PlacedItem>,
    /// Absent in snapshots written before the canvas was resizable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_size: Option<CanvasSize>,
}

impl ProjectSnapshot {
    /// Capture the current canvas.
    pub fn capture(canvas: &CanvasState) -> Self {
        Self {
            items: canvas.items().to_vec(),
            canvas_size: Some(canvas.canvas_size().into()),
        }
    }

    /// Rebuild a canvas, using `fallback_size` when the snapshot has none.
    pub fn into_canvas(self, fallback_size: Size) -> CanvasState {
        let size = self.canvas_size.map(Size::from).unwrap_or(fallback_size);
        CanvasState::from_items(self.items, size)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_value(&self) -> Result<serde_json::Value, SnapshotError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_value(value)?)
    }
}

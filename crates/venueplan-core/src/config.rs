//! Editor configuration.

use crate::camera::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use crate::snap::GRID_SIZE;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Size of a newly placed item when sizing is fixed.
pub const DEFAULT_ITEM_SIZE: Size = Size::new(100.0, 100.0);
/// Canvas size used until a snapshot provides one.
pub const DEFAULT_CANVAS_SIZE: Size = Size::new(2000.0, 1500.0);

/// Where the size of a newly placed item comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSizing {
    /// Every new item gets `default_item_size`.
    #[default]
    Fixed,
    /// New items take the natural footprint declared by their catalog entry.
    Catalog,
}

/// Tunables of the planner shell. Every field has a default, so partial JSON
/// documents are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Snapping increment in canvas units.
    pub grid_size: f64,
    pub default_item_size: Size,
    pub item_sizing: ItemSizing,
    pub canvas_size: Size,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            default_item_size: DEFAULT_ITEM_SIZE,
            item_sizing: ItemSizing::default(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_item_sizing(mut self, sizing: ItemSizing) -> Self {
        self.item_sizing = sizing;
        self
    }
}

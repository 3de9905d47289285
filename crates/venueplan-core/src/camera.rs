//! Camera module for the canvas zoom transform.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%" in the UI.
pub const BASE_ZOOM: f64 = 1.0;
/// Multiplicative step applied by zoom in / zoom out.
pub const ZOOM_STEP: f64 = 1.2;
/// Smallest allowed zoom level.
pub const MIN_ZOOM: f64 = 0.3;
/// Largest allowed zoom level.
pub const MAX_ZOOM: f64 = 3.0;

/// Camera manages the view transform for the canvas.
///
/// Pointer positions arrive in screen pixels relative to the viewport; the
/// camera converts them to canvas units. `origin` is where the canvas' top-left
/// corner sits on screen (zero unless the host scrolls the canvas element).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Screen position of the canvas origin.
    pub origin: Vec2,
    /// Current zoom level (BASE_ZOOM = 100% in UI).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
    /// Factor applied per zoom step.
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom bounds.
    pub fn with_limits(min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        Self {
            min_zoom,
            max_zoom,
            zoom_step,
            zoom: BASE_ZOOM.clamp(min_zoom, max_zoom),
            ..Self::default()
        }
    }

    /// Transform from canvas units to screen pixels.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.origin) * Affine::scale(self.zoom)
    }

    /// Transform from screen pixels to canvas units.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.origin)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Move the canvas origin (e.g. after the host scrolls the canvas element).
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Zoom in by one step, clamped to `max_zoom`.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.zoom_step).min(self.max_zoom);
    }

    /// Zoom out by one step, clamped to `min_zoom`.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.zoom_step).max(self.min_zoom);
    }

    /// Zoom as a rounded percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Reset camera to default origin and zoom.
    pub fn reset(&mut self) {
        self.origin = Vec2::ZERO;
        self.zoom = BASE_ZOOM.clamp(self.min_zoom, self.max_zoom);
    }
}

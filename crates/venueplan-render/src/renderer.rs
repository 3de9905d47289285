//! Renderer trait abstraction.

use kurbo::Size;
use peniko::Color;
use venueplan_core::canvas::CanvasState;
use venueplan_core::catalog::Catalog;
use venueplan_core::controller::PlacementPreview;
use venueplan_core::shell::PlannerShell;
use venueplan_core::snap::GRID_SIZE;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only intersection dots.
    Dots,
}

impl GridStyle {
    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Context for a single render.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a CanvasState,
    /// Catalog supplying each item's glyph.
    pub catalog: &'a Catalog,
    /// View zoom applied on top of canvas units.
    pub zoom: f64,
    /// Spacing of the visual grid, in canvas units.
    pub grid_size: f64,
    /// Background color.
    pub background_color: Color,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Grid line color.
    pub grid_color: Color,
    /// Selection highlight color.
    pub selection_color: Color,
    /// Item ID to highlight.
    pub selected: Option<&'a str>,
    /// Placement preview drawn on top of everything.
    pub preview: Option<PlacementPreview>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(canvas: &'a CanvasState, catalog: &'a Catalog) -> Self {
        Self {
            canvas,
            catalog,
            zoom: 1.0,
            grid_size: GRID_SIZE,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            grid_style: GridStyle::Lines,
            grid_color: Color::from_rgba8(224, 224, 224, 255),
            selection_color: Color::from_rgba8(25, 118, 210, 255), // Blue
            selected: None,
            preview: None,
        }
    }

    /// Context mirroring the current state of a planner.
    pub fn from_shell(shell: &'a PlannerShell) -> Self {
        Self::new(shell.canvas(), shell.catalog())
            .with_zoom(shell.zoom())
            .with_grid_size(shell.config().grid_size)
            .with_selected(shell.controller().selection())
            .with_preview(shell.preview())
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_grid_size(mut self, grid_size: f64) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    pub fn with_selected(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_preview(mut self, preview: Option<PlacementPreview>) -> Self {
        self.preview = preview;
        self
    }

    /// Canvas size scaled by zoom.
    pub fn viewport_size(&self) -> Size {
        let size = self.canvas.canvas_size();
        Size::new(size.width * self.zoom, size.height * self.zoom)
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene for the given context.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color.
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use std::sync::Arc;
    use venueplan_core::config::EditorConfig;

    #[test]
    fn test_grid_style_names() {
        assert_eq!(GridStyle::default(), GridStyle::Lines);
        assert_eq!(GridStyle::Dots.name(), "Dots");
        assert_eq!(GridStyle::None.name(), "None");
    }

    #[test]
    fn test_context_from_shell() {
        let mut shell =
            PlannerShell::new(Arc::new(Catalog::event_planning()), EditorConfig::default());
        shell.zoom_in();
        shell.choose_element("bar");
        shell.pointer_move(Point::new(120.0, 120.0));

        let ctx = RenderContext::from_shell(&shell);
        assert!((ctx.zoom - 1.2).abs() < 1e-9);
        let viewport = ctx.viewport_size();
        assert!((viewport.width - 2400.0).abs() < 1e-6);
        assert!((viewport.height - 1800.0).abs() < 1e-6);
        assert_eq!(ctx.preview.as_ref().map(|p| p.element.as_str()), Some("bar"));
    }
}

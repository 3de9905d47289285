//! SVG renderer: composes catalog glyphs into a standalone document.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer};
use kurbo::{BezPath, Point, Rect, Shape, Size};
use peniko::Color;
use std::fmt::Write as _;
use std::io::Write;
use venueplan_core::canvas::PlacedItem;
use venueplan_core::catalog::render::{escape_xml, format_number};
use venueplan_core::color::SerializableColor;

/// Gap between an item and its selection outline.
const SELECTION_PADDING: f64 = 2.0;
/// Half-size of a grid dot.
const DOT_SIZE: f64 = 1.0;
/// Grid intersections above which the grid is left out of the scene.
const MAX_GRID_POINTS: f64 = 250_000.0;

fn css(color: Color) -> String {
    SerializableColor::from(color).to_hex()
}

/// Types drawn as ellipses when no catalog glyph is available.
fn is_round_type(kind: &str) -> bool {
    kind.contains("round") || kind == "circle"
}

/// Renders a canvas as an SVG document string.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
}

impl SvgRenderer {
    /// Create a new SVG renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last built document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Take the last built document, leaving the renderer empty.
    pub fn take_document(&mut self) -> String {
        std::mem::take(&mut self.document)
    }

    /// Build and return a document in one step.
    pub fn render(ctx: &RenderContext) -> String {
        let mut renderer = Self::new();
        renderer.build_scene(ctx);
        renderer.take_document()
    }

    /// Write the last built document.
    pub fn write_to(&self, mut out: impl Write) -> RenderResult<()> {
        out.write_all(self.document.as_bytes())?;
        Ok(())
    }

    fn grid_path(style: GridStyle, size: Size, grid_size: f64) -> Option<BezPath> {
        if style == GridStyle::None || grid_size <= 0.0 {
            return None;
        }
        let points = (size.width / grid_size + 1.0) * (size.height / grid_size + 1.0);
        if !points.is_finite() || points > MAX_GRID_POINTS {
            log::warn!(
                "Skipping {} grid: {}x{} canvas at spacing {} is too dense",
                style.name(),
                size.width,
                size.height,
                grid_size
            );
            return None;
        }
        let mut path = BezPath::new();
        match style {
            GridStyle::None => return None,
            GridStyle::Lines => {
                let mut x = 0.0;
                while x <= size.width {
                    path.move_to(Point::new(x, 0.0));
                    path.line_to(Point::new(x, size.height));
                    x += grid_size;
                }
                let mut y = 0.0;
                while y <= size.height {
                    path.move_to(Point::new(0.0, y));
                    path.line_to(Point::new(size.width, y));
                    y += grid_size;
                }
            }
            GridStyle::Dots => {
                let dot = Size::new(DOT_SIZE * 2.0, DOT_SIZE * 2.0);
                let mut x = 0.0;
                while x <= size.width {
                    let mut y = 0.0;
                    while y <= size.height {
                        let rect = Rect::from_center_size(Point::new(x, y), dot);
                        path.extend(rect.path_elements(0.1));
                        y += grid_size;
                    }
                    x += grid_size;
                }
            }
        }
        Some(path)
    }

    fn render_grid(&mut self, ctx: &RenderContext) {
        let size = ctx.canvas.canvas_size();
        let Some(path) = Self::grid_path(ctx.grid_style, size, ctx.grid_size) else {
            return;
        };
        let color = css(ctx.grid_color);
        let paint = match ctx.grid_style {
            GridStyle::Dots => format!(r#"fill="{}""#, color),
            _ => format!(r#"fill="none" stroke="{}" stroke-width="1""#, color),
        };
        let _ = write!(
            self.document,
            r#"<path class="grid" d="{}" {}/>"#,
            path.to_svg(),
            paint
        );
    }

    fn render_item(&mut self, item: &PlacedItem, ctx: &RenderContext) {
        let bounds = item.bounds();
        let Some(definition) = ctx.catalog.get_element(&item.kind) else {
            self.render_fallback(item);
            return;
        };

        let footprint = definition.footprint(&item.properties);
        let scale = |target: f64, natural: f64| if natural > 0.0 { target / natural } else { 1.0 };
        let center = bounds.center();
        let _ = write!(
            self.document,
            r#"<g data-id="{}" data-type="{}" transform="translate({} {}) scale({} {})">{}</g>"#,
            escape_xml(&item.id),
            escape_xml(&item.kind),
            format_number(center.x),
            format_number(center.y),
            format_number(scale(bounds.width(), footprint.width)),
            format_number(scale(bounds.height(), footprint.height)),
            definition.render_2d(&item.properties),
        );
    }

    /// Unregistered type: labelled grey box.
    fn render_fallback(&mut self, item: &PlacedItem) {
        let bounds = item.bounds();
        let center = bounds.center();
        let shape = if is_round_type(&item.kind) {
            format!(
                r##"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="#f0f0f0" stroke="#999999"/>"##,
                format_number(center.x),
                format_number(center.y),
                format_number(bounds.width() / 2.0),
                format_number(bounds.height() / 2.0),
            )
        } else {
            format!(
                r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#f0f0f0" stroke="#999999"/>"##,
                format_number(bounds.x0),
                format_number(bounds.y0),
                format_number(bounds.width()),
                format_number(bounds.height()),
            )
        };
        let _ = write!(
            self.document,
            r#"<g data-id="{}" data-type="{}">{}<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="12">{}</text></g>"#,
            escape_xml(&item.id),
            escape_xml(&item.kind),
            shape,
            format_number(center.x),
            format_number(center.y),
            escape_xml(&item.kind),
        );
    }

    fn render_selection(&mut self, item: &PlacedItem, ctx: &RenderContext) {
        let outline = item.bounds().inflate(SELECTION_PADDING, SELECTION_PADDING);
        let _ = write!(
            self.document,
            r#"<rect class="selection" x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            format_number(outline.x0),
            format_number(outline.y0),
            format_number(outline.width()),
            format_number(outline.height()),
            css(ctx.selection_color),
        );
    }

    fn render_preview(&mut self, ctx: &RenderContext) {
        let Some(preview) = &ctx.preview else {
            return;
        };
        let bounds = preview.bounds();
        let color = css(ctx.selection_color);
        let style = format!(
            r#"fill="{}" fill-opacity="0.2" stroke="{}" stroke-dasharray="4 4""#,
            color, color
        );
        let _ = if is_round_type(&preview.element) {
            let center = bounds.center();
            write!(
                self.document,
                r#"<ellipse class="preview" cx="{}" cy="{}" rx="{}" ry="{}" {}/>"#,
                format_number(center.x),
                format_number(center.y),
                format_number(bounds.width() / 2.0),
                format_number(bounds.height() / 2.0),
                style,
            )
        } else {
            write!(
                self.document,
                r#"<rect class="preview" x="{}" y="{}" width="{}" height="{}" {}/>"#,
                format_number(bounds.x0),
                format_number(bounds.y0),
                format_number(bounds.width()),
                format_number(bounds.height()),
                style,
            )
        };
    }
}

impl Renderer for SvgRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.document.clear();
        let size = ctx.canvas.canvas_size();
        let viewport = ctx.viewport_size();

        let _ = write!(
            self.document,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = format_number(viewport.width),
            h = format_number(viewport.height),
        );
        let _ = write!(
            self.document,
            r#"<g transform="scale({})"><rect class="background" width="{}" height="{}" fill="{}"/>"#,
            format_number(ctx.zoom),
            format_number(size.width),
            format_number(size.height),
            css(self.background_color(ctx)),
        );

        self.render_grid(ctx);

        for item in ctx.canvas.items() {
            self.render_item(item, ctx);
        }

        if let Some(selected) = ctx.selected.and_then(|id| ctx.canvas.get(id)) {
            self.render_selection(selected, ctx);
        }

        self.render_preview(ctx);

        self.document.push_str("</g></svg>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use venueplan_core::canvas::CanvasState;
    use venueplan_core::catalog::Catalog;
    use venueplan_core::config::EditorConfig;
    use venueplan_core::shell::PlannerShell;

    fn canvas_with(items: Vec<PlacedItem>) -> CanvasState {
        CanvasState::from_items(items, Size::new(200.0, 100.0))
    }

    fn item(id: &str, kind: &str, x: f64, y: f64) -> PlacedItem {
        PlacedItem::new(id, kind, Point::new(x, y), Size::new(100.0, 100.0))
    }

    #[test]
    fn test_empty_scene() {
        let catalog = Catalog::new();
        let canvas = canvas_with(Vec::new());
        let ctx = RenderContext::new(&canvas, &catalog).with_grid(GridStyle::None);
        let svg = SvgRenderer::render(&ctx);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(r#"width="200" height="100""#));
        assert!(!svg.contains("grid"));
    }

    #[test]
    fn test_grid_styles() {
        let catalog = Catalog::new();
        let canvas = canvas_with(Vec::new());
        let lines = SvgRenderer::render(&RenderContext::new(&canvas, &catalog));
        assert!(lines.contains(r#"class="grid""#));
        assert!(lines.contains("stroke=\"#e0e0e0\""));

        let ctx = RenderContext::new(&canvas, &catalog).with_grid(GridStyle::Dots);
        let dots = SvgRenderer::render(&ctx);
        assert!(dots.contains("fill=\"#e0e0e0\""));
    }

    #[test]
    fn test_oversized_canvas_skips_grid() {
        let catalog = Catalog::event_planning();
        let canvas = CanvasState::from_items(
            vec![item("a", "bar", 0.0, 0.0)],
            Size::new(1_000_000.0, 1_000_000.0),
        );
        let ctx = RenderContext::new(&canvas, &catalog).with_grid(GridStyle::Dots);
        let svg = SvgRenderer::render(&ctx);
        assert!(!svg.contains(r#"class="grid""#));
        assert!(svg.contains(r#"data-id="a""#));

        let default_size = Size::new(2000.0, 1500.0);
        assert!(SvgRenderer::grid_path(GridStyle::Lines, default_size, 20.0).is_some());
        let unbounded = Size::new(f64::INFINITY, 10.0);
        assert!(SvgRenderer::grid_path(GridStyle::Lines, unbounded, 20.0).is_none());
    }

    #[test]
    fn test_items_in_z_order() {
        let catalog = Catalog::event_planning();
        let canvas = canvas_with(vec![item("a", "stage", 0.0, 0.0), item("b", "bar", 50.0, 0.0)]);
        let svg = SvgRenderer::render(&RenderContext::new(&canvas, &catalog));
        let a = svg.find(r#"data-id="a""#).unwrap();
        let b = svg.find(r#"data-id="b""#).unwrap();
        assert!(a < b);
        assert!(svg.contains("STAGE"));
    }

    #[test]
    fn test_glyph_scaled_into_item_box() {
        let catalog = Catalog::event_planning();
        // Stage glyph is 500 x 300 by default.
        let canvas = canvas_with(vec![item("a", "stage", 0.0, 0.0)]);
        let svg = SvgRenderer::render(&RenderContext::new(&canvas, &catalog));
        assert!(svg.contains("translate(50 50) scale(0.2 0.33)"));
    }

    #[test]
    fn test_unknown_type_fallback() {
        let catalog = Catalog::new();
        let canvas = canvas_with(vec![
            item("a", "piano", 0.0, 0.0),
            item("b", "circle", 100.0, 0.0),
        ]);
        let svg = SvgRenderer::render(&RenderContext::new(&canvas, &catalog));
        assert!(svg.contains(r#"<rect x="0" y="0" width="100" height="100""#));
        assert!(svg.contains(r#"<ellipse cx="150" cy="50" rx="50" ry="50""#));
        assert!(svg.contains(">piano</text>"));
    }

    #[test]
    fn test_selection_and_preview() {
        let mut shell =
            PlannerShell::new(Arc::new(Catalog::event_planning()), EditorConfig::default());
        shell.choose_element("round-table");
        shell.pointer_down(Point::new(0.0, 0.0));
        shell.select_tool();
        shell.pointer_down(Point::new(10.0, 10.0));
        shell.pointer_up(Point::new(10.0, 10.0));

        let svg = SvgRenderer::render(&RenderContext::from_shell(&shell));
        assert!(svg.contains(r#"class="selection" x="-2" y="-2" width="104" height="104""#));
        assert!(!svg.contains(r#"class="preview""#));

        shell.choose_element("round-table");
        shell.pointer_move(Point::new(133.0, 47.0));
        let svg = SvgRenderer::render(&RenderContext::from_shell(&shell));
        assert!(svg.contains(r#"<ellipse class="preview" cx="190" cy="90""#));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_zoom_scales_document() {
        let catalog = Catalog::new();
        let canvas = canvas_with(Vec::new());
        let svg = SvgRenderer::render(&RenderContext::new(&canvas, &catalog).with_zoom(2.0));
        assert!(svg.contains(r#"width="400" height="200""#));
        assert!(svg.contains(r#"<g transform="scale(2)">"#));
    }

    #[test]
    fn test_write_to() {
        let catalog = Catalog::new();
        let canvas = canvas_with(Vec::new());
        let mut renderer = SvgRenderer::new();
        renderer.build_scene(&RenderContext::new(&canvas, &catalog));
        let mut out = Vec::new();
        renderer.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), renderer.document());
    }
}

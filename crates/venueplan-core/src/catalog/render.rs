//! Appearance conventions and per-prototype element renderers.
//!
//! Each prototype (`lines`, `holes`, `items`) has one [`ElementRenderer`]
//! implementation. Renderers are pure: they read the element's appearance and
//! the resolved property values and return markup centered on the local origin.

use super::ElementDefinition;
use super::property::PropertyValues;
use crate::color::SerializableColor;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Glyph size used when an element declares no usable dimensions.
pub const DEFAULT_FOOTPRINT: f64 = 100.0;
/// Wall thickness assumed when a line element has no `thickness` property.
pub const DEFAULT_WALL_THICKNESS: f64 = 20.0;
/// Depth of the opening drawn for doors and windows.
pub const HOLE_DEPTH: f64 = 20.0;
/// Table-top thickness of round tables in the 3D description.
const ROUND_TOP_HEIGHT: f64 = 2.0;
/// Radius of the central leg of round tables in the 3D description.
const ROUND_LEG_RADIUS: f64 = 5.0;

/// How an element's body is filled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    #[default]
    None,
    Solid(SerializableColor),
    /// Read from a color property of the instance.
    Property(String),
}

/// Text drawn at the element's center.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    #[default]
    None,
    Text(String),
    /// Display value of an instance property (e.g. seat count).
    Property(String),
}

/// Height of the element in the 3D description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Elevation {
    Fixed(f64),
    /// Read from a length property of the instance.
    Property(String),
}

impl Default for Elevation {
    fn default() -> Self {
        Elevation::Fixed(0.0)
    }
}

/// Outline drawn by the prototype renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Glyph {
    /// Rectangle, optionally with rounded corners.
    Box { corner_radius: f64 },
    /// Circle whose diameter is the `width` property.
    Round,
    /// Door with one or two swinging leaves.
    Door { leaves: u8 },
    /// Door with two sliding panels.
    SlidingDoor,
    /// Window split into panes.
    Window { panes: u8 },
}

impl Default for Glyph {
    fn default() -> Self {
        Glyph::Box { corner_radius: 0.0 }
    }
}

/// Immutable style conventions baked into an element definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub fill: Paint,
    pub fill_opacity: Option<f64>,
    pub label: Label,
    pub label_color: Option<SerializableColor>,
    pub glyph: Glyph,
    pub elevation: Elevation,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            stroke: SerializableColor::black(),
            stroke_width: 2.0,
            fill: Paint::None,
            fill_opacity: None,
            label: Label::None,
            label_color: None,
            glyph: Glyph::default(),
            elevation: Elevation::default(),
        }
    }
}

impl Appearance {
    pub fn with_fill(mut self, fill: Paint) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f64) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    pub fn with_label_color(mut self, color: SerializableColor) -> Self {
        self.label_color = Some(color);
        self
    }

    pub fn with_glyph(mut self, glyph: Glyph) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn with_elevation(mut self, elevation: Elevation) -> Self {
        self.elevation = elevation;
        self
    }
}

/// Everything a renderer may read: the definition and resolved properties.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub element: &'a ElementDefinition,
    pub properties: &'a PropertyValues,
}

impl<'a> RenderInput<'a> {
    pub fn new(element: &'a ElementDefinition, properties: &'a PropertyValues) -> Self {
        Self {
            element,
            properties,
        }
    }

    fn appearance(&self) -> &'a Appearance {
        &self.element.appearance
    }

    /// A length property in canvas units (centimeters).
    pub fn length(&self, name: &str) -> Option<f64> {
        self.properties
            .get(name)
            .and_then(|v| v.as_length())
            .map(|m| m.in_cm())
    }

    pub fn fill(&self) -> Option<SerializableColor> {
        match &self.appearance().fill {
            Paint::None => None,
            Paint::Solid(color) => Some(*color),
            Paint::Property(name) => self.properties.get(name).and_then(|v| v.as_color()),
        }
    }

    pub fn label(&self) -> Option<String> {
        match &self.appearance().label {
            Label::None => None,
            Label::Text(text) => Some(text.clone()),
            Label::Property(name) => self.properties.get(name).map(|v| v.to_string()),
        }
    }

    pub fn elevation(&self) -> f64 {
        match &self.appearance().elevation {
            Elevation::Fixed(height) => *height,
            Elevation::Property(name) => self.length(name).unwrap_or(0.0),
        }
    }

    /// Inline `style` attribute for the element body.
    fn body_style(&self) -> String {
        let appearance = self.appearance();
        let fill = self.fill().map_or_else(|| "none".to_string(), |c| c.to_hex());
        let mut style = format!(
            "stroke: {};stroke-width: {}px;fill: {}",
            appearance.stroke,
            format_number(appearance.stroke_width),
            fill
        );
        if let Some(opacity) = appearance.fill_opacity {
            style.push_str(&format!(";fill-opacity: {}", format_number(opacity)));
        }
        style
    }

    /// Centered label, or an empty string when the element has none.
    fn label_markup(&self, cx: f64, cy: f64) -> String {
        let Some(text) = self.label() else {
            return String::new();
        };
        let color = self
            .appearance()
            .label_color
            .map(|c| format!(" fill: {};", c))
            .unwrap_or_default();
        format!(
            r#"<text x="{}" y="{}" text-anchor="middle" alignment-baseline="central" style="font-weight: bold;{}">{}</text>"#,
            format_number(cx),
            format_number(cy),
            color,
            escape_xml(&text)
        )
    }
}

/// Rendering capability of one element prototype.
pub trait ElementRenderer: Send + Sync {
    /// Natural 2D size of the glyph in canvas units.
    fn footprint(&self, input: &RenderInput<'_>) -> Size;

    /// SVG markup of the top view, centered on the origin.
    fn render_2d(&self, input: &RenderInput<'_>) -> String;

    /// Descriptive markup of the 3D volume.
    fn render_3d(&self, input: &RenderInput<'_>) -> String;
}

/// Renderer for wall-like linear elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRenderer;

/// Renderer for openings (doors, windows).
#[derive(Debug, Clone, Copy, Default)]
pub struct HoleRenderer;

/// Renderer for freestanding furnishings and areas.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemRenderer;

impl ElementRenderer for LineRenderer {
    fn footprint(&self, input: &RenderInput<'_>) -> Size {
        Size::new(
            input.length("length").unwrap_or(DEFAULT_FOOTPRINT),
            input.length("thickness").unwrap_or(DEFAULT_WALL_THICKNESS),
        )
    }

    fn render_2d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, height } = self.footprint(input);
        let stroke = input.appearance().stroke;
        format!(
            concat!(
                r#"<g transform="translate({}, {})">"#,
                r#"<rect width="{}" height="{}" style="{}"/>"#,
                r#"<line x1="0" y1="{}" x2="{}" y2="{}" style="stroke: {};stroke-width: 1px;stroke-dasharray: 4 2"/>"#,
                "</g>"
            ),
            format_number(-width / 2.0),
            format_number(-height / 2.0),
            format_number(width),
            format_number(height),
            input.body_style(),
            format_number(height / 2.0),
            format_number(width),
            format_number(height / 2.0),
            stroke,
        )
    }

    fn render_3d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, height } = self.footprint(input);
        format!(
            r#"<g><cube width="{}" depth="{}" height="{}" /></g>"#,
            format_number(width),
            format_number(height),
            format_number(input.elevation())
        )
    }
}

impl ElementRenderer for HoleRenderer {
    fn footprint(&self, input: &RenderInput<'_>) -> Size {
        Size::new(
            input.length("width").unwrap_or(DEFAULT_FOOTPRINT),
            HOLE_DEPTH,
        )
    }

    fn render_2d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, height } = self.footprint(input);
        let stroke = input.appearance().stroke;
        let thin = format!("stroke: {};stroke-width: 1px;fill: none", stroke);
        let mut body = format!(
            r#"<rect width="{}" height="{}" style="{}"/>"#,
            format_number(width),
            format_number(height),
            input.body_style()
        );

        match input.appearance().glyph {
            Glyph::Door { leaves } => {
                let leaves = leaves.clamp(1, 2);
                let leaf = width / f64::from(leaves);
                body.push_str(&format!(
                    r#"<path d="M 0 0 L 0 {} A {} {} 0 0 1 {} 0" style="{}"/>"#,
                    format_number(-leaf),
                    format_number(leaf),
                    format_number(leaf),
                    format_number(leaf),
                    thin
                ));
                if leaves == 2 {
                    body.push_str(&format!(
                        r#"<path d="M {} 0 L {} {} A {} {} 0 0 0 {} 0" style="{}"/>"#,
                        format_number(width),
                        format_number(width),
                        format_number(-leaf),
                        format_number(leaf),
                        format_number(leaf),
                        format_number(width - leaf),
                        thin
                    ));
                }
            }
            Glyph::SlidingDoor => {
                body.push_str(&format!(
                    r#"<line x1="0" y1="{}" x2="{}" y2="{}" style="{}"/>"#,
                    format_number(height / 3.0),
                    format_number(width * 0.6),
                    format_number(height / 3.0),
                    thin
                ));
                body.push_str(&format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" style="{}"/>"#,
                    format_number(width * 0.4),
                    format_number(height * 2.0 / 3.0),
                    format_number(width),
                    format_number(height * 2.0 / 3.0),
                    thin
                ));
            }
            Glyph::Window { panes } => {
                body.push_str(&format!(
                    r#"<line x1="0" y1="{}" x2="{}" y2="{}" style="{}"/>"#,
                    format_number(height / 2.0),
                    format_number(width),
                    format_number(height / 2.0),
                    thin
                ));
                let panes = panes.max(1);
                for i in 1..panes {
                    let x = width * f64::from(i) / f64::from(panes);
                    body.push_str(&format!(
                        r#"<line x1="{}" y1="0" x2="{}" y2="{}" style="{}"/>"#,
                        format_number(x),
                        format_number(x),
                        format_number(height),
                        thin
                    ));
                }
            }
            Glyph::Box { .. } | Glyph::Round => {}
        }

        format!(
            r#"<g transform="translate({}, {})">{}</g>"#,
            format_number(-width / 2.0),
            format_number(-height / 2.0),
            body
        )
    }

    fn render_3d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, .. } = self.footprint(input);
        format!(
            r#"<g><opening width="{}" height="{}" altitude="{}" /></g>"#,
            format_number(width),
            format_number(input.length("height").unwrap_or(0.0)),
            format_number(input.length("altitude").unwrap_or(0.0))
        )
    }
}

impl ElementRenderer for ItemRenderer {
    fn footprint(&self, input: &RenderInput<'_>) -> Size {
        let width = input.length("width").unwrap_or(DEFAULT_FOOTPRINT);
        match input.appearance().glyph {
            Glyph::Round => Size::new(width, width),
            _ => Size::new(width, input.length("depth").unwrap_or(width)),
        }
    }

    fn render_2d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, height } = self.footprint(input);
        let shape = match input.appearance().glyph {
            Glyph::Round => {
                let radius = width / 2.0;
                format!(
                    r#"<circle cx="{r}" cy="{r}" r="{r}" style="{}"/>"#,
                    input.body_style(),
                    r = format_number(radius)
                )
            }
            Glyph::Box { corner_radius } if corner_radius > 0.0 => format!(
                r#"<rect width="{}" height="{}" rx="{r}" ry="{r}" style="{}"/>"#,
                format_number(width),
                format_number(height),
                input.body_style(),
                r = format_number(corner_radius)
            ),
            _ => format!(
                r#"<rect width="{}" height="{}" style="{}"/>"#,
                format_number(width),
                format_number(height),
                input.body_style()
            ),
        };

        format!(
            r#"<g transform="translate({}, {})">{}{}</g>"#,
            format_number(-width / 2.0),
            format_number(-height / 2.0),
            shape,
            input.label_markup(width / 2.0, height / 2.0)
        )
    }

    fn render_3d(&self, input: &RenderInput<'_>) -> String {
        let Size { width, height } = self.footprint(input);
        let elevation = input.elevation();
        match input.appearance().glyph {
            Glyph::Round => {
                let mut markup = format!(
                    r#"<g><cylinder radius="{}" height="{}" />"#,
                    format_number(width / 2.0),
                    format_number(ROUND_TOP_HEIGHT)
                );
                if elevation > 0.0 {
                    markup.push_str(&format!(
                        r#"<cylinder radius="{}" height="{}" />"#,
                        format_number(ROUND_LEG_RADIUS),
                        format_number(elevation)
                    ));
                }
                markup.push_str("</g>");
                markup
            }
            _ => format!(
                r#"<g><cube width="{}" depth="{}" height="{}" /></g>"#,
                format_number(width),
                format_number(height),
                format_number(elevation)
            ),
        }
    }
}

/// Format a coordinate for markup: at most two decimals, no trailing zeros.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded + 0.0)
}

/// Escape text for use inside XML content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

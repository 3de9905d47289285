//! Built-in event-planning elements.

use super::property::PropertyDefinition;
use super::render::{Appearance, Elevation, Glyph, Label, Paint};
use super::{Catalog, CatalogError, ElementDefinition, Prototype};
use crate::color::SerializableColor;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150x150?text=";

fn placeholder(text: &str) -> String {
    format!("{}{}", PLACEHOLDER_IMAGE, text.replace(' ', "+"))
}

fn seats() -> PropertyDefinition {
    PropertyDefinition::number("seats", "Seats", 8.0).with_range(4.0, 12.0)
}

fn tablecloth() -> PropertyDefinition {
    PropertyDefinition::color("tablecloth", "Tablecloth Color", SerializableColor::white())
}

fn event_type() -> PropertyDefinition {
    PropertyDefinition::enumeration(
        "eventType",
        "Event Type",
        "wedding",
        &[
            ("wedding", "Wedding"),
            ("corporate", "Corporate"),
            ("birthday", "Birthday"),
            ("conference", "Conference"),
        ],
    )
}

fn wall() -> ElementDefinition {
    ElementDefinition::new("wall", Prototype::Lines)
        .with_info("Wall", "Wall for room layout")
        .with_image(placeholder("Wall"))
        .with_category("walls")
        .with_property(PropertyDefinition::length("length", "Length", 300.0))
        .with_property(PropertyDefinition::length("height", "Height", 300.0))
        .with_property(PropertyDefinition::length("thickness", "Thickness", 20.0))
        .with_appearance(
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0x8e, 0x8e, 0x8e)))
                .with_elevation(Elevation::Property("height".into())),
        )
}

fn hole(
    name: &str,
    title: &str,
    description: &str,
    category: &str,
    glyph: Glyph,
    (width, height, altitude): (f64, f64, f64),
) -> ElementDefinition {
    ElementDefinition::new(name, Prototype::Holes)
        .with_info(title, description)
        .with_image(placeholder(title))
        .with_category(category)
        .with_property(PropertyDefinition::length("width", "Width", width))
        .with_property(PropertyDefinition::length("height", "Height", height))
        .with_property(PropertyDefinition::length("altitude", "Altitude", altitude))
        .with_appearance(
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::white()))
                .with_glyph(glyph),
        )
}

/// A rectangular furnishing with a fixed fill and centered caption.
fn area(
    name: &str,
    title: &str,
    description: &str,
    (width, depth): (f64, f64),
    appearance: Appearance,
) -> ElementDefinition {
    ElementDefinition::new(name, Prototype::Items)
        .with_info(title, description)
        .with_image(placeholder(title))
        .with_category("areas")
        .with_property(PropertyDefinition::length("width", "Width", width))
        .with_property(PropertyDefinition::length("depth", "Depth", depth))
        .with_appearance(appearance)
}

/// Register the structural elements and event furnishings.
pub fn register_event_elements(catalog: &mut Catalog) -> Result<(), CatalogError> {
    let white = SerializableColor::white();
    let elements = vec![
        wall(),
        hole(
            "door",
            "Door",
            "Door for room access",
            "doors",
            Glyph::Door { leaves: 1 },
            (90.0, 210.0, 0.0),
        ),
        hole(
            "door-double",
            "Double Door",
            "Double-leaf door",
            "doors",
            Glyph::Door { leaves: 2 },
            (160.0, 210.0, 0.0),
        ),
        hole(
            "panic-door",
            "Panic Door",
            "Emergency exit door",
            "doors",
            Glyph::Door { leaves: 1 },
            (90.0, 210.0, 0.0),
        ),
        hole(
            "panic-door-double",
            "Double Panic Door",
            "Double-leaf emergency exit door",
            "doors",
            Glyph::Door { leaves: 2 },
            (200.0, 215.0, 0.0),
        ),
        hole(
            "sliding-door",
            "Sliding Door",
            "Two-panel sliding door",
            "doors",
            Glyph::SlidingDoor,
            (180.0, 210.0, 0.0),
        ),
        hole(
            "window",
            "Window",
            "Window for natural light",
            "windows",
            Glyph::Window { panes: 1 },
            (120.0, 120.0, 90.0),
        ),
        hole(
            "sash-window",
            "Sash Window",
            "Two-pane sash window",
            "windows",
            Glyph::Window { panes: 2 },
            (90.0, 140.0, 80.0),
        ),
        hole(
            "venetian-blind-window",
            "Venetian Blind",
            "Window with slatted blinds",
            "windows",
            Glyph::Window { panes: 6 },
            (90.0, 100.0, 90.0),
        ),
        hole(
            "window-curtain",
            "Window Curtain",
            "Window with drawn curtains",
            "windows",
            Glyph::Window { panes: 2 },
            (90.0, 100.0, 90.0),
        )
        .with_appearance(
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0xb7, 0x1c, 0x1c)))
                .with_fill_opacity(0.4)
                .with_glyph(Glyph::Window { panes: 2 }),
        ),
        ElementDefinition::new("round-table", Prototype::Items)
            .with_info("Round Table", "Round table for event seating")
            .with_image(placeholder("Round Table"))
            .with_category("tables")
            .with_property(PropertyDefinition::length("width", "Width", 120.0))
            .with_property(seats())
            .with_property(tablecloth())
            .with_appearance(
                Appearance::default()
                    .with_glyph(Glyph::Round)
                    .with_fill(Paint::Property("tablecloth".into()))
                    .with_label(Label::Property("seats".into()))
                    .with_elevation(Elevation::Fixed(75.0)),
            ),
        ElementDefinition::new("rect-table", Prototype::Items)
            .with_info("Rectangular Table", "Rectangular table for event seating")
            .with_image(placeholder("Rect Table"))
            .with_category("tables")
            .with_property(PropertyDefinition::length("width", "Width", 200.0))
            .with_property(PropertyDefinition::length("depth", "Depth", 100.0))
            .with_property(seats())
            .with_property(tablecloth())
            .with_appearance(
                Appearance::default()
                    .with_fill(Paint::Property("tablecloth".into()))
                    .with_label(Label::Property("seats".into()))
                    .with_elevation(Elevation::Fixed(2.0)),
            ),
        area(
            "stage",
            "Stage",
            "Performance area",
            (500.0, 300.0),
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0x9c, 0x83, 0x52)))
                .with_label(Label::Text("STAGE".into()))
                .with_label_color(white)
                .with_elevation(Elevation::Property("height".into())),
        )
        .with_property(PropertyDefinition::length("height", "Height", 50.0))
        .with_property(event_type()),
        area(
            "bar",
            "Bar",
            "Bar area for drinks",
            (300.0, 80.0),
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0x5d, 0x40, 0x37)))
                .with_label(Label::Text("BAR".into()))
                .with_label_color(white)
                .with_elevation(Elevation::Fixed(110.0)),
        ),
        area(
            "dj-booth",
            "DJ Booth",
            "Music/DJ booth",
            (150.0, 100.0),
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0x42, 0x42, 0x42)))
                .with_label(Label::Text("DJ".into()))
                .with_label_color(white)
                .with_elevation(Elevation::Fixed(90.0)),
        ),
        area(
            "dance-floor",
            "Dance Floor",
            "Area for dancing",
            (400.0, 400.0),
            Appearance::default()
                .with_fill(Paint::Solid(SerializableColor::rgb(0x9e, 0x9e, 0x9e)))
                .with_fill_opacity(0.5)
                .with_label(Label::Text("DANCE FLOOR".into()))
                .with_elevation(Elevation::Fixed(1.0)),
        ),
        area(
            "seating-area",
            "Seating Area",
            "Lounge seating area",
            (300.0, 200.0),
            Appearance::default()
                .with_glyph(Glyph::Box { corner_radius: 20.0 })
                .with_fill(Paint::Solid(SerializableColor::rgb(0x8d, 0x6e, 0x63)))
                .with_fill_opacity(0.5)
                .with_label(Label::Text("LOUNGE".into()))
                .with_elevation(Elevation::Fixed(45.0)),
        ),
    ];

    for element in elements {
        catalog.register_element(element)?;
    }
    Ok(())
}

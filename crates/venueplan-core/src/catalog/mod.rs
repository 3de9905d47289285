//! Catalog of placeable element types.
//!
//! A [`Catalog`] is built explicitly (usually via [`Catalog::event_planning`]
//! plus any custom registrations) and then handed to the planner shell behind
//! an `Arc`. Once shared it is never mutated.

pub mod property;
pub mod render;
mod standard;

pub use property::{
    EnumOption, LengthMeasure, LengthUnit, PropertyDefinition, PropertyKind, PropertySchema,
    PropertyValue, PropertyValues,
};
pub use render::{
    Appearance, Elevation, ElementRenderer, Glyph, HoleRenderer, ItemRenderer, Label,
    LineRenderer, Paint, RenderInput,
};
pub use standard::register_event_elements;

use kurbo::Size;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Category assigned to elements that declare none.
pub const DEFAULT_CATEGORY: &str = "other";

/// Catalog errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Element definition has no name")]
    MissingName,
}

/// Structural category of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prototype {
    /// Wall-like linear elements.
    Lines,
    /// Openings such as doors and windows.
    Holes,
    /// Freestanding furnishings.
    Items,
}

impl Prototype {
    /// The renderer responsible for this category.
    pub fn renderer(self) -> &'static dyn ElementRenderer {
        match self {
            Prototype::Lines => &LineRenderer,
            Prototype::Holes => &HoleRenderer,
            Prototype::Items => &ItemRenderer,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Prototype::Lines => "lines",
            Prototype::Holes => "holes",
            Prototype::Items => "items",
        }
    }
}

/// Display information for the catalog panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementInfo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Preview image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A catalog entry: metadata, property schema and appearance of one element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefinition {
    pub name: String,
    pub prototype: Prototype,
    pub info: ElementInfo,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    #[serde(default)]
    pub appearance: Appearance,
}

impl ElementDefinition {
    /// Create a definition titled after its name, with no properties.
    pub fn new(name: impl Into<String>, prototype: Prototype) -> Self {
        let name = name.into();
        Self {
            info: ElementInfo {
                title: name.clone(),
                ..ElementInfo::default()
            },
            name,
            prototype,
            properties: Vec::new(),
            appearance: Appearance::default(),
        }
    }

    pub fn with_info(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.info.title = title.into();
        self.info.description = description.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.info.image = Some(image.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.info.category = Some(category.into());
        self
    }

    /// Add a property, replacing any earlier one with the same name.
    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        if let Some(existing) = self.properties.iter_mut().find(|p| p.name == property.name) {
            *existing = property;
        } else {
            self.properties.push(property);
        }
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn category(&self) -> &str {
        self.info.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Property values a newly placed instance starts with.
    pub fn default_properties(&self) -> PropertyValues {
        self.properties
            .iter()
            .map(|p| (p.name.clone(), p.schema.default_value()))
            .collect()
    }

    /// Validate a value for one of this element's properties.
    pub fn conform_property(&self, name: &str, value: PropertyValue) -> Option<PropertyValue> {
        self.property(name).and_then(|p| p.schema.conform(value))
    }

    /// Defaults overlaid with the instance values that fit the schema.
    ///
    /// Unknown names and values of the wrong kind are ignored.
    pub fn resolve_properties(&self, instance: &PropertyValues) -> PropertyValues {
        let mut resolved = self.default_properties();
        for (name, value) in instance {
            if let Some(value) = self.conform_property(name, value.clone()) {
                resolved.insert(name.clone(), value);
            }
        }
        resolved
    }

    pub fn renderer(&self) -> &'static dyn ElementRenderer {
        self.prototype.renderer()
    }

    /// Natural glyph size for the given instance properties.
    pub fn footprint(&self, instance: &PropertyValues) -> Size {
        let resolved = self.resolve_properties(instance);
        self.renderer().footprint(&RenderInput::new(self, &resolved))
    }

    /// Top-view SVG markup for an instance, centered on the origin.
    pub fn render_2d(&self, instance: &PropertyValues) -> String {
        let resolved = self.resolve_properties(instance);
        self.renderer().render_2d(&RenderInput::new(self, &resolved))
    }

    /// 3D description markup for an instance.
    pub fn render_3d(&self, instance: &PropertyValues) -> String {
        let resolved = self.resolve_properties(instance);
        self.renderer().render_3d(&RenderInput::new(self, &resolved))
    }
}

/// Registry of element definitions keyed by name, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    elements: HashMap<String, ElementDefinition>,
    order: Vec<String>,
    categories: Vec<String>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in event-planning catalog (structure and furnishings).
    pub fn event_planning() -> Self {
        let mut catalog = Self::new();
        if let Err(err) = register_event_elements(&mut catalog) {
            log::error!("Built-in catalog is incomplete: {}", err);
        }
        catalog
    }

    /// Register a definition, replacing any previous one with the same name.
    ///
    /// Returns the replaced definition. A replaced name keeps its original
    /// position in iteration order.
    pub fn register_element(
        &mut self,
        definition: ElementDefinition,
    ) -> Result<Option<ElementDefinition>, CatalogError> {
        if definition.name.trim().is_empty() {
            return Err(CatalogError::MissingName);
        }

        let category = definition.category().to_string();
        let name = definition.name.clone();
        let previous = self.elements.insert(name.clone(), definition);
        match &previous {
            Some(old) if old.category() != category => {
                log::debug!("Catalog element '{}' moved to '{}'", name, category);
                self.rebuild_categories();
            }
            Some(_) => log::debug!("Catalog element '{}' re-registered", name),
            None => {
                self.order.push(name);
                if !self.categories.contains(&category) {
                    self.categories.push(category);
                }
            }
        }
        Ok(previous)
    }

    /// Recompute categories from the current definitions, dropping empty ones.
    fn rebuild_categories(&mut self) {
        let mut categories: Vec<String> = Vec::new();
        for definition in self.get_elements() {
            if !categories.iter().any(|c| c == definition.category()) {
                categories.push(definition.category().to_string());
            }
        }
        self.categories = categories;
    }

    /// Look up a definition by name.
    pub fn get_element(&self, name: &str) -> Option<&ElementDefinition> {
        self.elements.get(name)
    }

    /// All definitions in insertion order.
    pub fn get_elements(&self) -> impl Iterator<Item = &ElementDefinition> {
        self.order.iter().filter_map(|name| self.elements.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Categories in the order they were first seen.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Definitions belonging to `category`, in insertion order.
    pub fn elements_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ElementDefinition> + 'a {
        self.get_elements().filter(move |e| e.category() == category)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

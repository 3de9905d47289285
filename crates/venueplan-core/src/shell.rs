//! Planner shell: the editor surface the host application drives.
//!
//! Owns the canvas and the interaction controller, shares the catalog, and
//! hands a [`ProjectSnapshot`] to the host on save.

use crate::canvas::{CanvasState, PlacedItem};
use crate::catalog::{Catalog, PropertyValue};
use crate::config::EditorConfig;
use crate::controller::{Interaction, InteractionController, PlacementPreview};
use crate::input::PointerEvent;
use crate::snapshot::ProjectSnapshot;
use crate::tools::ToolSelection;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Called with the snapshot on every save.
pub type SaveCallback = Box<dyn FnMut(&ProjectSnapshot) + Send>;

/// Errors from editing an item directly.
#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),
    #[error("Element '{0}' is not in the catalog")]
    UnknownElement(String),
    #[error("Invalid value for property '{property}' of '{element}'")]
    InvalidProperty { element: String, property: String },
}

/// One entry of the catalog panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category: String,
}

/// Text shown in the status bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    /// Snapped pointer position.
    pub position: Option<Point>,
    pub tool: String,
    /// Element being placed in add mode, or the type of the selected item.
    pub selected: Option<String>,
    pub zoom_percent: u32,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(p) => write!(f, "Position: {}, {}", p.x, p.y)?,
            None => write!(f, "Position: -")?,
        }
        write!(f, " | Current Tool: {}", self.tool)?;
        if let Some(selected) = &self.selected {
            write!(f, " | Selected Item: {}", selected)?;
        }
        write!(f, " | {}%", self.zoom_percent)
    }
}

/// The editor: catalog, canvas, controller and the save hook.
pub struct PlannerShell {
    catalog: Arc<Catalog>,
    canvas: CanvasState,
    controller: InteractionController,
    on_save: Option<SaveCallback>,
}

impl fmt::Debug for PlannerShell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannerShell")
            .field("catalog", &self.catalog.len())
            .field("canvas", &self.canvas)
            .field("controller", &self.controller)
            .field("on_save", &self.on_save.is_some())
            .finish()
    }
}

impl PlannerShell {
    /// Create an empty planner over `catalog`.
    pub fn new(catalog: Arc<Catalog>, config: EditorConfig) -> Self {
        Self {
            catalog,
            canvas: CanvasState::new(config.canvas_size),
            controller: InteractionController::new(config),
            on_save: None,
        }
    }

    /// Start from an existing snapshot.
    pub fn with_snapshot(mut self, snapshot: ProjectSnapshot) -> Self {
        self.load(snapshot);
        self
    }

    pub fn with_on_save(mut self, callback: SaveCallback) -> Self {
        self.on_save = Some(callback);
        self
    }

    pub fn set_on_save(&mut self, callback: Option<SaveCallback>) {
        self.on_save = callback;
    }

    /// Replace the canvas with a snapshot's contents.
    pub fn load(&mut self, snapshot: ProjectSnapshot) {
        let fallback = self.controller.config().canvas_size;
        self.canvas = snapshot.into_canvas(fallback);
        self.controller.clear_selection();
        log::info!("Loaded {} items", self.canvas.len());
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn canvas(&self) -> &CanvasState {
        &self.canvas
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn config(&self) -> &EditorConfig {
        self.controller.config()
    }

    /// Entries for the catalog panel, in catalog order.
    pub fn catalog_entries(&self) -> Vec<CatalogEntry> {
        self.catalog
            .get_elements()
            .map(|e| CatalogEntry {
                name: e.name.clone(),
                title: e.info.title.clone(),
                description: e.info.description.clone(),
                image: e.info.image.clone(),
                category: e.category().to_string(),
            })
            .collect()
    }

    // --- Tools ---

    pub fn tool(&self) -> &ToolSelection {
        self.controller.tool()
    }

    /// Pick a catalog element for placement. Unknown names are ignored.
    pub fn choose_element(&mut self, element: &str) -> bool {
        self.controller.choose_element(&self.catalog, element)
    }

    pub fn select_tool(&mut self) {
        self.controller.select_tool();
    }

    // --- Pointer ---

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Interaction {
        self.controller
            .handle_pointer(event, &mut self.canvas, &self.catalog)
    }

    pub fn pointer_down(&mut self, position: Point) -> Interaction {
        self.handle_pointer(PointerEvent::Down { position })
    }

    pub fn pointer_move(&mut self, position: Point) -> Interaction {
        self.handle_pointer(PointerEvent::Move { position })
    }

    pub fn pointer_up(&mut self, position: Point) -> Interaction {
        self.handle_pointer(PointerEvent::Up { position })
    }

    pub fn pointer_leave(&mut self) -> Interaction {
        self.handle_pointer(PointerEvent::Leave)
    }

    // --- Editing ---

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        self.controller
            .selection()
            .and_then(|id| self.canvas.get(id))
    }

    pub fn can_delete(&self) -> bool {
        self.controller.can_delete(&self.canvas)
    }

    /// Delete the item being dragged, if any.
    pub fn delete_dragged(&mut self) -> Option<PlacedItem> {
        self.controller.delete_dragged(&mut self.canvas)
    }

    /// Set one property on a placed item, validated against its catalog schema.
    pub fn set_item_property(
        &mut self,
        item_id: &str,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), EditError> {
        let item = self
            .canvas
            .get_mut(item_id)
            .ok_or_else(|| EditError::ItemNotFound(item_id.to_string()))?;
        let definition = self
            .catalog
            .get_element(&item.kind)
            .ok_or_else(|| EditError::UnknownElement(item.kind.clone()))?;

        match definition.conform_property(property, value) {
            Some(value) => {
                item.properties.insert(property.to_string(), value);
                Ok(())
            }
            None => {
                log::warn!("Rejected value for {}.{} on {}", item.kind, property, item_id);
                Err(EditError::InvalidProperty {
                    element: item.kind.clone(),
                    property: property.to_string(),
                })
            }
        }
    }

    // --- View ---

    pub fn zoom_in(&mut self) {
        self.controller.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.controller.zoom_out();
    }

    pub fn zoom(&self) -> f64 {
        self.controller.camera().zoom
    }

    pub fn zoom_percent(&self) -> u32 {
        self.controller.camera().zoom_percent()
    }

    pub fn preview(&self) -> Option<PlacementPreview> {
        self.controller.preview(&self.catalog)
    }

    pub fn status(&self) -> StatusLine {
        let tool = self.controller.tool();
        let selected = match tool.element() {
            Some(element) => Some(element.to_string()),
            None => self.selected_item().map(|item| item.kind.clone()),
        };
        StatusLine {
            position: self.controller.snapped_pointer(),
            tool: match tool {
                ToolSelection::Select => "select".to_string(),
                ToolSelection::Add { .. } => "add".to_string(),
            },
            selected,
            zoom_percent: self.zoom_percent(),
        }
    }

    // --- Save ---

    pub fn snapshot(&self) -> ProjectSnapshot {
        ProjectSnapshot::capture(&self.canvas)
    }

    /// Whether a save callback is installed.
    pub fn can_save(&self) -> bool {
        self.on_save.is_some()
    }

    /// Capture a snapshot and hand it to the save callback.
    pub fn save(&mut self) -> ProjectSnapshot {
        let snapshot = self.snapshot();
        match self.on_save.as_mut() {
            Some(callback) => {
                callback(&snapshot);
                log::info!("Saved {} items", snapshot.items.len());
            }
            None => log::debug!("Save requested without a save handler"),
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ElementDefinition, PropertyDefinition, Prototype};
    use crate::color::SerializableColor;
    use kurbo::Size;
    use std::sync::Mutex;

    fn shell() -> PlannerShell {
        PlannerShell::new(Arc::new(Catalog::event_planning()), EditorConfig::default())
    }

    #[test]
    fn test_place_and_drag() {
        let mut shell = shell();
        shell.choose_element("round-table");
        shell.pointer_down(Point::new(133.0, 47.0));
        shell.pointer_up(Point::new(133.0, 47.0));

        shell.select_tool();
        shell.pointer_down(Point::new(150.0, 50.0));
        shell.pointer_move(Point::new(250.0, 150.0));
        shell.pointer_up(Point::new(250.0, 150.0));

        let item = &shell.canvas().items()[0];
        assert_eq!(item.position(), Point::new(240.0, 140.0));
        assert_eq!(shell.selected_item().map(|i| i.id.as_str()), Some(item.id.as_str()));
    }

    #[test]
    fn test_load_snapshot() {
        let json = r#"{
            "items": [
                {"id":"a","type":"stage","x":0,"y":0,"width":100,"height":100},
                {"id":"a","type":"bar","x":20,"y":0,"width":100,"height":100}
            ],
            "canvasSize": {"width": 900, "height": 700}
        }"#;
        let snapshot = ProjectSnapshot::from_json(json).unwrap();
        let shell = shell().with_snapshot(snapshot);
        assert_eq!(shell.canvas().len(), 1);
        assert_eq!(shell.canvas().items()[0].kind, "stage");
        assert_eq!(shell.canvas().canvas_size(), Size::new(900.0, 700.0));
    }

    #[test]
    fn test_save_invokes_callback() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&saved);
        let mut shell = shell();
        assert!(!shell.can_save());
        shell.set_on_save(Some(Box::new(move |snapshot: &ProjectSnapshot| {
            sink.lock().unwrap().push(snapshot.clone());
        })));
        assert!(shell.can_save());

        shell.choose_element("bar");
        shell.pointer_down(Point::new(40.0, 40.0));
        let snapshot = shell.save();

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0], snapshot);
        assert_eq!(snapshot.items.len(), 1);
    }

    #[test]
    fn test_delete_needs_active_drag() {
        let mut shell = shell();
        shell.choose_element("bar");
        shell.pointer_down(Point::new(0.0, 0.0));
        assert!(!shell.can_delete());
        assert!(shell.delete_dragged().is_none());
        assert_eq!(shell.canvas().len(), 1);

        shell.select_tool();
        shell.pointer_down(Point::new(10.0, 10.0));
        shell.pointer_up(Point::new(10.0, 10.0));
        assert!(shell.selected_item().is_some());
        assert!(!shell.can_delete());
        assert!(shell.delete_dragged().is_none());
        assert_eq!(shell.canvas().len(), 1);

        shell.pointer_down(Point::new(10.0, 10.0));
        assert!(shell.can_delete());
        assert!(shell.delete_dragged().is_some());
        assert!(shell.canvas().is_empty());
    }

    #[test]
    fn test_set_item_property() {
        let mut shell = shell();
        shell.choose_element("round-table");
        shell.pointer_down(Point::new(0.0, 0.0));
        let id = shell.canvas().items()[0].id.clone();

        shell
            .set_item_property(&id, "seats", PropertyValue::Number(20.0))
            .unwrap();
        assert_eq!(
            shell.canvas().get(&id).unwrap().property("seats"),
            Some(&PropertyValue::Number(12.0))
        );

        let err = shell
            .set_item_property(&id, "seats", PropertyValue::Enum("lots".into()))
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidProperty { .. }));
        assert_eq!(
            shell.set_item_property("nope", "seats", PropertyValue::Number(8.0)),
            Err(EditError::ItemNotFound("nope".into()))
        );
    }

    #[test]
    fn test_instances_edit_independently() {
        let mut shell = shell();
        shell.choose_element("round-table");
        shell.pointer_down(Point::new(0.0, 0.0));
        shell.pointer_down(Point::new(200.0, 0.0));
        let ids: Vec<_> = shell.canvas().items().iter().map(|i| i.id.clone()).collect();

        let red = SerializableColor::rgb(255, 0, 0);
        shell
            .set_item_property(&ids[0], "tablecloth", PropertyValue::Color(red))
            .unwrap();
        assert_eq!(
            shell.canvas().get(&ids[1]).unwrap().property("tablecloth"),
            Some(&PropertyValue::Color(SerializableColor::white()))
        );
    }

    #[test]
    fn test_catalog_override_before_injection() {
        let mut catalog = Catalog::event_planning();
        catalog
            .register_element(
                ElementDefinition::new("door", Prototype::Holes)
                    .with_info("Wide Door", "")
                    .with_property(PropertyDefinition::length("width", "Width", 120.0)),
            )
            .unwrap();
        let shell = PlannerShell::new(Arc::new(catalog), EditorConfig::default());
        let door = shell
            .catalog_entries()
            .into_iter()
            .filter(|e| e.name == "door")
            .collect::<Vec<_>>();
        assert_eq!(door.len(), 1);
        assert_eq!(door[0].title, "Wide Door");
    }

    #[test]
    fn test_status_and_zoom() {
        let mut shell = shell();
        shell.pointer_move(Point::new(133.0, 47.0));
        assert_eq!(
            shell.status().to_string(),
            "Position: 140, 40 | Current Tool: select | 100%"
        );

        shell.choose_element("stage");
        shell.zoom_in();
        let status = shell.status();
        assert_eq!(status.tool, "add");
        assert_eq!(status.selected.as_deref(), Some("stage"));
        assert_eq!(status.zoom_percent, 120);

        for _ in 0..20 {
            shell.zoom_in();
        }
        assert!((shell.zoom() - 3.0).abs() < f64::EPSILON);
        for _ in 0..40 {
            shell.zoom_out();
        }
        assert!((shell.zoom() - 0.3).abs() < f64::EPSILON);
    }
}

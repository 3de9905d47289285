//! Pointer interaction state machine.
//!
//! The controller interprets pointer events against the current tool: in
//! select mode a press picks up the first item under the pointer and a
//! move drags it along the grid; in add mode a press places a new instance of
//! the chosen element. It never owns the canvas or catalog, both are passed
//! in by the shell.

use crate::camera::Camera;
use crate::canvas::{CanvasState, ItemId, PlacedItem};
use crate::catalog::Catalog;
use crate::config::{EditorConfig, ItemSizing};
use crate::input::PointerEvent;
use crate::snap::snap_to_grid;
use crate::tools::ToolSelection;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// An item currently being dragged.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub item_id: ItemId,
    /// Pointer position minus item position at pickup, in canvas units.
    pub grab_offset: Vec2,
}

/// What a pointer event did to the canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// Nothing changed.
    None,
    /// A new item was appended.
    Placed(ItemId),
    /// An item was picked up and selected.
    PickedUp(ItemId),
    /// The dragged item moved.
    Dragged(ItemId),
    /// The active drag ended.
    Released(ItemId),
}

/// Where a new item would land if the pointer were pressed now.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementPreview {
    pub element: String,
    pub position: Point,
    pub size: Size,
}

impl PlacementPreview {
    pub fn bounds(&self) -> kurbo::Rect {
        kurbo::Rect::from_origin_size(self.position, self.size)
    }
}

/// Tool, drag and selection state of the editor.
#[derive(Debug, Clone)]
pub struct InteractionController {
    tool: ToolSelection,
    drag: Option<DragState>,
    /// Last item picked up; survives the end of the drag.
    selection: Option<ItemId>,
    /// Last pointer position in canvas units.
    pointer: Option<Point>,
    camera: Camera,
    config: EditorConfig,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl InteractionController {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            tool: ToolSelection::Select,
            drag: None,
            selection: None,
            pointer: None,
            camera: Camera::with_limits(config.min_zoom, config.max_zoom, config.zoom_step),
            config,
        }
    }

    pub fn tool(&self) -> &ToolSelection {
        &self.tool
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Pointer position snapped to the grid.
    pub fn snapped_pointer(&self) -> Option<Point> {
        self.pointer.map(|p| snap_to_grid(p, self.config.grid_size))
    }

    /// Switch to add mode for `element`. Unregistered names are ignored.
    pub fn choose_element(&mut self, catalog: &Catalog, element: &str) -> bool {
        if !catalog.contains(element) {
            log::debug!("Ignoring unknown element '{}'", element);
            return false;
        }
        self.set_tool(ToolSelection::add(element));
        true
    }

    /// Return to select mode.
    pub fn select_tool(&mut self) {
        self.set_tool(ToolSelection::Select);
    }

    fn set_tool(&mut self, tool: ToolSelection) {
        if self.drag.take().is_some() {
            log::debug!("Tool change ended active drag");
        }
        log::debug!("Tool: {}", tool.label());
        self.tool = tool;
    }

    /// Process one pointer event. Misses are no-ops, never errors.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        canvas: &mut CanvasState,
        catalog: &Catalog,
    ) -> Interaction {
        if let Some(screen) = event.position() {
            self.pointer = Some(self.camera.screen_to_canvas(screen));
        }

        match event {
            PointerEvent::Down { .. } => self.on_down(canvas, catalog),
            PointerEvent::Move { .. } => self.on_move(canvas),
            PointerEvent::Up { .. } => self.release(),
            PointerEvent::Leave => {
                self.pointer = None;
                self.release()
            }
        }
    }

    fn on_down(&mut self, canvas: &mut CanvasState, catalog: &Catalog) -> Interaction {
        let Some(point) = self.pointer else {
            return Interaction::None;
        };

        match self.tool.clone() {
            ToolSelection::Select => {
                let Some(item) = canvas.hit_test(point) else {
                    return Interaction::None;
                };
                let id = item.id.clone();
                self.drag = Some(DragState {
                    item_id: id.clone(),
                    grab_offset: point - item.position(),
                });
                self.selection = Some(id.clone());
                log::debug!("Picked up {}", id);
                Interaction::PickedUp(id)
            }
            ToolSelection::Add { element } => {
                let Some(definition) = catalog.get_element(&element) else {
                    return Interaction::None;
                };
                let properties = definition.default_properties();
                let size = match self.config.item_sizing {
                    ItemSizing::Fixed => self.config.default_item_size,
                    ItemSizing::Catalog => definition.footprint(&properties),
                };
                let id = canvas.next_id(chrono::Utc::now().timestamp_millis());
                let position = snap_to_grid(point, self.config.grid_size);
                let item = PlacedItem::new(id.clone(), element, position, size)
                    .with_properties(properties);
                canvas.push(item);
                log::debug!("Placed {} at ({}, {})", id, position.x, position.y);
                Interaction::Placed(id)
            }
        }
    }

    fn on_move(&mut self, canvas: &mut CanvasState) -> Interaction {
        let (Some(point), Some(drag)) = (self.pointer, self.drag.as_ref()) else {
            return Interaction::None;
        };
        let target = snap_to_grid(point - drag.grab_offset, self.config.grid_size);
        let id = drag.item_id.clone();
        if canvas.move_item(&id, target) {
            Interaction::Dragged(id)
        } else {
            // Dragged item is gone.
            self.drag = None;
            Interaction::None
        }
    }

    fn release(&mut self) -> Interaction {
        match self.drag.take() {
            Some(drag) => Interaction::Released(drag.item_id),
            None => Interaction::None,
        }
    }

    /// Whether an item is being dragged, and so can be deleted.
    pub fn can_delete(&self, canvas: &CanvasState) -> bool {
        self.drag.as_ref().is_some_and(|d| canvas.contains(&d.item_id))
    }

    /// Remove the item being dragged. Without an active drag this is a no-op,
    /// even if an earlier pickup is still selected.
    pub fn delete_dragged(&mut self, canvas: &mut CanvasState) -> Option<PlacedItem> {
        let id = self.drag.take()?.item_id;
        if self.selection.as_deref() == Some(id.as_str()) {
            self.selection = None;
        }
        let removed = canvas.remove(&id);
        if removed.is_some() {
            log::debug!("Deleted {}", id);
        }
        removed
    }

    /// Forget selection and drag, e.g. after the canvas was replaced.
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.drag = None;
    }

    /// Placement preview at the snapped pointer, in add mode.
    pub fn preview(&self, catalog: &Catalog) -> Option<PlacementPreview> {
        let element = self.tool.element()?;
        let position = self.snapped_pointer()?;
        let definition = catalog.get_element(element)?;
        let size = match self.config.item_sizing {
            ItemSizing::Fixed => self.config.default_item_size,
            ItemSizing::Catalog => definition.footprint(&definition.default_properties()),
        };
        Some(PlacementPreview {
            element: element.to_string(),
            position,
            size,
        })
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
    }
}

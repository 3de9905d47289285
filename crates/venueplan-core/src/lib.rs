//! VenuePlan Core Library
//!
//! Platform-agnostic editing core for event floor plans: the element catalog,
//! the canvas model, pointer interaction and the project store boundary.

pub mod camera;
pub mod canvas;
pub mod catalog;
pub mod color;
pub mod config;
pub mod controller;
pub mod input;
pub mod project;
pub mod shell;
pub mod snap;
pub mod snapshot;
pub mod storage;
pub mod tools;

pub use camera::Camera;
pub use canvas::{CanvasState, ItemId, PlacedItem};
pub use catalog::{Catalog, CatalogError, ElementDefinition, Prototype};
pub use color::SerializableColor;
pub use config::{EditorConfig, ItemSizing};
pub use controller::{DragState, Interaction, InteractionController, PlacementPreview};
pub use input::PointerEvent;
pub use project::{
    Access, Collaborator, ProjectDraft, ProjectError, ProjectRecord, ProjectUpdate, Role,
};
pub use shell::{CatalogEntry, EditError, PlannerShell, SaveCallback, StatusLine};
pub use snap::{snap_to_grid, GRID_SIZE};
pub use snapshot::{CanvasSize, ProjectSnapshot, SnapshotError};
pub use storage::{MemoryProjectStore, ProjectStore, StorageError};
pub use tools::ToolSelection;

//! Tool selection for the planner.

use serde::{Deserialize, Serialize};

/// The active editing tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolSelection {
    /// Pick up and drag existing items.
    #[default]
    Select,
    /// Place new instances of a catalog element.
    Add { element: String },
}

impl ToolSelection {
    pub fn add(element: impl Into<String>) -> Self {
        ToolSelection::Add {
            element: element.into(),
        }
    }

    pub fn is_select(&self) -> bool {
        matches!(self, ToolSelection::Select)
    }

    /// The element being placed, in add mode.
    pub fn element(&self) -> Option<&str> {
        match self {
            ToolSelection::Select => None,
            ToolSelection::Add { element } => Some(element),
        }
    }

    /// Short label for the toolbar and status line.
    pub fn label(&self) -> String {
        match self {
            ToolSelection::Select => "Select".to_string(),
            ToolSelection::Add { element } => format!("Add {}", element),
        }
    }
}

//! Scripted editing sessions.
//!
//! A session is a JSON array of actions replayed against a [`PlannerShell`],
//! the same calls a toolbar, catalog panel and canvas would make.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use venueplan_core::catalog::PropertyValue;
use venueplan_core::controller::Interaction;
use venueplan_core::shell::{EditError, PlannerShell};

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Step {step}: no item to edit")]
    NoTarget { step: usize },
    #[error("Step {step}: {source}")]
    Edit {
        step: usize,
        #[source]
        source: EditError,
    },
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    /// Pick a catalog element (switches to add mode).
    ChooseElement { element: String },
    /// Return to select mode.
    SelectTool,
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    /// Delete the item being dragged.
    Delete,
    ZoomIn,
    ZoomOut,
    /// Set a property on `item`, or on the selected item when omitted
    /// (falling back to the most recently placed one).
    SetProperty {
        #[serde(default)]
        item: Option<String>,
        property: String,
        value: PropertyValue,
    },
    Save,
}

/// Counters collected while replaying a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub steps: usize,
    pub placed: usize,
    pub deleted: usize,
    pub saves: usize,
}

/// Parse a session from JSON.
pub fn parse_session(json: &str) -> Result<Vec<SessionAction>, SessionError> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a session file.
pub fn load_session(path: &Path) -> Result<Vec<SessionAction>, SessionError> {
    let json = std::fs::read_to_string(path)?;
    parse_session(&json)
}

/// Replay `actions` against `shell`.
///
/// Pointer actions never fail; a property edit that the catalog rejects
/// stops the session.
pub fn run_session(
    shell: &mut PlannerShell,
    actions: &[SessionAction],
) -> Result<SessionReport, SessionError> {
    let mut report = SessionReport::default();
    // Most recently placed item, the fallback target for property edits.
    let mut last_placed: Option<String> = None;

    for (step, action) in actions.iter().enumerate() {
        log::debug!("Step {}: {:?}", step, action);
        match action {
            SessionAction::ChooseElement { element } => {
                if !shell.choose_element(element) {
                    log::warn!("Step {}: unknown element '{}'", step, element);
                }
            }
            SessionAction::SelectTool => shell.select_tool(),
            SessionAction::PointerDown { x, y } => {
                if let Interaction::Placed(id) = shell.pointer_down(Point::new(*x, *y)) {
                    report.placed += 1;
                    last_placed = Some(id);
                }
            }
            SessionAction::PointerMove { x, y } => {
                shell.pointer_move(Point::new(*x, *y));
            }
            SessionAction::PointerUp { x, y } => {
                shell.pointer_up(Point::new(*x, *y));
            }
            SessionAction::PointerLeave => {
                shell.pointer_leave();
            }
            SessionAction::Delete => {
                if let Some(item) = shell.delete_dragged() {
                    report.deleted += 1;
                    if last_placed.as_deref() == Some(item.id.as_str()) {
                        last_placed = None;
                    }
                }
            }
            SessionAction::ZoomIn => shell.zoom_in(),
            SessionAction::ZoomOut => shell.zoom_out(),
            SessionAction::SetProperty {
                item,
                property,
                value,
            } => {
                let target = item
                    .clone()
                    .or_else(|| shell.selected_item().map(|i| i.id.clone()))
                    .or_else(|| last_placed.clone())
                    .ok_or(SessionError::NoTarget { step })?;
                shell
                    .set_item_property(&target, property, value.clone())
                    .map_err(|source| SessionError::Edit { step, source })?;
            }
            SessionAction::Save => {
                shell.save();
                report.saves += 1;
            }
        }
        report.steps += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use venueplan_core::catalog::Catalog;
    use venueplan_core::config::EditorConfig;

    fn shell() -> PlannerShell {
        PlannerShell::new(Arc::new(Catalog::event_planning()), EditorConfig::default())
    }

    #[test]
    fn test_parse_actions() {
        let actions = parse_session(
            r#"[
                {"action": "choose_element", "element": "round-table"},
                {"action": "pointer_down", "x": 133, "y": 47},
                {"action": "set_property", "property": "seats", "value": {"type": "number", "value": 10}},
                {"action": "save"}
            ]"#,
        )
        .unwrap();
        assert_eq!(actions.len(), 4);
        assert_eq!(
            actions[0],
            SessionAction::ChooseElement {
                element: "round-table".into()
            }
        );
        assert!(matches!(actions[2], SessionAction::SetProperty { item: None, .. }));
    }

    #[test]
    fn test_place_drag_and_edit() {
        let mut shell = shell();
        let actions = vec![
            SessionAction::ChooseElement {
                element: "round-table".into(),
            },
            SessionAction::PointerDown { x: 133.0, y: 47.0 },
            SessionAction::SetProperty {
                item: None,
                property: "seats".into(),
                value: PropertyValue::Number(10.0),
            },
            SessionAction::SelectTool,
            SessionAction::PointerDown { x: 150.0, y: 50.0 },
            SessionAction::PointerMove { x: 253.0, y: 98.0 },
            SessionAction::PointerUp { x: 253.0, y: 98.0 },
            SessionAction::Save,
        ];

        let report = run_session(&mut shell, &actions).unwrap();
        assert_eq!(report.steps, 8);
        assert_eq!(report.placed, 1);
        assert_eq!(report.saves, 1);

        let item = &shell.canvas().items()[0];
        assert_eq!(item.position(), Point::new(240.0, 80.0));
        assert_eq!(item.property("seats"), Some(&PropertyValue::Number(10.0)));
    }

    #[test]
    fn test_rejected_edit_stops_session() {
        let mut shell = shell();
        let actions = vec![
            SessionAction::ChooseElement {
                element: "bar".into(),
            },
            SessionAction::PointerDown { x: 0.0, y: 0.0 },
            SessionAction::SetProperty {
                item: None,
                property: "seats".into(),
                value: PropertyValue::Number(4.0),
            },
            SessionAction::Delete,
        ];
        let err = run_session(&mut shell, &actions).unwrap_err();
        assert!(matches!(err, SessionError::Edit { step: 2, .. }));
        assert_eq!(shell.canvas().len(), 1);
    }

    #[test]
    fn test_edit_without_items() {
        let mut shell = shell();
        let actions = vec![SessionAction::SetProperty {
            item: None,
            property: "seats".into(),
            value: PropertyValue::Number(4.0),
        }];
        let err = run_session(&mut shell, &actions).unwrap_err();
        assert!(matches!(err, SessionError::NoTarget { step: 0 }));
    }

    #[test]
    fn test_delete_dragged_item() {
        let mut shell = shell();
        let actions = vec![
            SessionAction::ChooseElement {
                element: "bar".into(),
            },
            SessionAction::PointerDown { x: 0.0, y: 0.0 },
            SessionAction::Delete,
            SessionAction::SelectTool,
            SessionAction::PointerDown { x: 10.0, y: 10.0 },
            SessionAction::PointerUp { x: 10.0, y: 10.0 },
            SessionAction::Delete,
        ];
        let report = run_session(&mut shell, &actions).unwrap();
        assert_eq!(report.deleted, 0);
        assert_eq!(shell.canvas().len(), 1);

        let actions = vec![
            SessionAction::PointerDown { x: 10.0, y: 10.0 },
            SessionAction::Delete,
        ];
        let report = run_session(&mut shell, &actions).unwrap();
        assert_eq!(report.deleted, 1);
        assert!(shell.canvas().is_empty());
    }
}

//! Project records: a named, shareable plan as kept by the project store.
//!
//! The plan itself travels as opaque JSON (`plannerData`); only the shell
//! interprets it, through [`ProjectSnapshot`].

use crate::snapshot::{ProjectSnapshot, SnapshotError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifier of a user, issued by the external authentication layer.
pub type UserId = String;

/// Project errors.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("User is already a collaborator")]
    AlreadyCollaborator(UserId),
    #[error("Collaborator not found")]
    CollaboratorNotFound(UserId),
}

/// What a collaborator may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Viewer,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collaborator {
    pub user: UserId,
    #[serde(default)]
    pub role: Role,
}

/// Operations guarded by [`ProjectRecord::authorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    View,
    Edit,
    Delete,
    AddCollaborator,
    RemoveCollaborator,
}

impl Access {
    fn denied_message(self) -> &'static str {
        match self {
            Access::View => "Not authorized to access this project",
            Access::Edit => "Not authorized to edit this project",
            Access::Delete => "Not authorized to delete this project",
            Access::AddCollaborator => "Not authorized to add collaborators",
            Access::RemoveCollaborator => "Not authorized to remove collaborators",
        }
    }
}

/// A stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    /// Owner of the project.
    #[serde(rename = "user")]
    pub owner: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub planner_data: serde_json::Value,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectRecord {
    pub fn is_owner(&self, user: &str) -> bool {
        self.owner == user
    }

    pub fn collaborator(&self, user: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.user == user)
    }

    /// Owner, any collaborator, or anyone if the project is public.
    pub fn can_view(&self, user: &str) -> bool {
        self.is_public || self.is_owner(user) || self.collaborator(user).is_some()
    }

    /// Owner or an editor collaborator.
    pub fn can_edit(&self, user: &str) -> bool {
        self.is_owner(user) || self.collaborator(user).is_some_and(|c| c.role == Role::Editor)
    }

    /// Check that `user` may perform `access`.
    pub fn authorize(&self, user: &str, access: Access) -> Result<(), ProjectError> {
        let allowed = match access {
            Access::View => self.can_view(user),
            Access::Edit => self.can_edit(user),
            Access::Delete | Access::AddCollaborator | Access::RemoveCollaborator => {
                self.is_owner(user)
            }
        };
        if allowed {
            Ok(())
        } else {
            Err(ProjectError::Unauthorized(access.denied_message()))
        }
    }

    pub fn add_collaborator(
        &mut self,
        user: impl Into<UserId>,
        role: Role,
    ) -> Result<(), ProjectError> {
        let user = user.into();
        if self.collaborator(&user).is_some() {
            return Err(ProjectError::AlreadyCollaborator(user));
        }
        self.collaborators.push(Collaborator { user, role });
        Ok(())
    }

    pub fn remove_collaborator(&mut self, user: &str) -> Result<Collaborator, ProjectError> {
        let index = self
            .collaborators
            .iter()
            .position(|c| c.user == user)
            .ok_or_else(|| ProjectError::CollaboratorNotFound(user.to_string()))?;
        Ok(self.collaborators.remove(index))
    }

    /// Interpret the planner data as a snapshot.
    pub fn snapshot(&self) -> Result<ProjectSnapshot, SnapshotError> {
        ProjectSnapshot::from_value(self.planner_data.clone())
    }

    pub fn set_snapshot(&mut self, snapshot: &ProjectSnapshot) -> Result<(), SnapshotError> {
        self.planner_data = snapshot.to_value()?;
        Ok(())
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Fields supplied when creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub planner_data: Option<serde_json::Value>,
    pub thumbnail: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, planner_data: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            planner_data: Some(planner_data),
            ..Self::default()
        }
    }

    /// Collect every validation failure.
    pub fn validate(&self) -> Result<(), ProjectError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if self.planner_data.as_ref().is_none_or(is_empty_json) {
            errors.push("Project data is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProjectError::Validation(errors))
        }
    }

    /// Validate and turn the draft into a new record owned by `owner`.
    pub fn into_record(self, owner: impl Into<UserId>) -> Result<ProjectRecord, ProjectError> {
        self.validate()?;
        let now = Utc::now();
        Ok(ProjectRecord {
            id: Uuid::new_v4(),
            owner: owner.into(),
            name: self.name,
            description: self.description,
            thumbnail: self.thumbnail,
            planner_data: self.planner_data.unwrap_or_default(),
            collaborators: Vec::new(),
            is_public: self.is_public.unwrap_or(false),
            tags: self.tags.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

fn is_empty_json(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.is_empty(),
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Partial update: absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub planner_data: Option<serde_json::Value>,
    pub thumbnail: Option<String>,
    pub is_public: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl ProjectUpdate {
    /// Apply to `record`. Empty names and empty planner data are ignored.
    pub fn apply(self, record: &mut ProjectRecord) {
        if let Some(name) = self.name.filter(|n| !n.trim().is_empty()) {
            record.name = name;
        }
        if let Some(description) = self.description {
            record.description = Some(description);
        }
        if let Some(data) = self.planner_data.filter(|d| !is_empty_json(d)) {
            record.planner_data = data;
        }
        if let Some(thumbnail) = self.thumbnail.filter(|t| !t.is_empty()) {
            record.thumbnail = Some(thumbnail);
        }
        if let Some(is_public) = self.is_public {
            record.is_public = is_public;
        }
        if let Some(tags) = self.tags {
            record.tags = tags;
        }
    }
}

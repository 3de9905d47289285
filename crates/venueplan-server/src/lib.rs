//! VenuePlan Project Server
//!
//! REST service storing named floor plans. Authentication happens upstream;
//! the caller's identity arrives in the `x-user-id` header.
//!
//! ## Routes
//!
//! ```text
//! POST   /api/projects                              create
//! GET    /api/projects                              list visible projects
//! GET    /api/projects/{id}                         fetch
//! PUT    /api/projects/{id}                         partial update
//! DELETE /api/projects/{id}                         delete (owner only)
//! POST   /api/projects/{id}/collaborators           add collaborator (owner only)
//! DELETE /api/projects/{id}/collaborators/{user_id} remove collaborator (owner only)
//! GET    /health
//! ```

use axum::{
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tracing::{error, info, warn};
use uuid::Uuid;
use venueplan_core::project::{
    Access, ProjectDraft, ProjectError, ProjectRecord, ProjectUpdate, Role,
};
use venueplan_core::storage::{MemoryProjectStore, ProjectStore, StorageError};

/// Header carrying the authenticated user id.
pub const USER_HEADER: &str = "x-user-id";
/// Environment variable holding the listen address.
pub const ADDR_ENV: &str = "VENUEPLAN_ADDR";
/// Listen address used when none is configured.
pub const DEFAULT_ADDR: SocketAddr =
    SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 3030);

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: DEFAULT_ADDR }
    }
}

impl ServerConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Self {
        Self::from_addr_var(std::env::var(ADDR_ENV).ok().as_deref())
    }

    fn from_addr_var(value: Option<&str>) -> Self {
        let addr = match value {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Invalid {} '{}': {}, using {}", ADDR_ENV, raw, e, DEFAULT_ADDR);
                DEFAULT_ADDR
            }),
            None => DEFAULT_ADDR,
        };
        Self { addr }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryProjectStore::new()))
    }

    /// Load a project by its path segment; malformed ids are simply not found.
    async fn project(&self, id: &str) -> Result<ProjectRecord, ApiError> {
        let id = Uuid::parse_str(id).map_err(|_| ApiError::NotFound("Project not found"))?;
        Ok(self.store.load(id).await?)
    }
}

/// API errors, rendered the way clients of the service expect.
#[derive(Debug)]
pub enum ApiError {
    /// 400 `{ "errors": [{ "msg": ... }] }`
    Validation(Vec<String>),
    /// 400 `{ "msg": ... }`
    BadRequest(String),
    /// 401 `{ "msg": ... }`
    Unauthorized(String),
    /// 404 `{ "msg": ... }`
    NotFound(&'static str),
    /// 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(messages) => {
                let errors: Vec<_> =
                    messages.into_iter().map(|msg| json!({ "msg": msg })).collect();
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "msg": msg }))).into_response()
            }
            ApiError::Internal(detail) => {
                error!("{}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error").into_response()
            }
        }
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Validation(messages) => ApiError::Validation(messages),
            ProjectError::Unauthorized(msg) => ApiError::Unauthorized(msg.to_string()),
            ProjectError::AlreadyCollaborator(_) => {
                ApiError::BadRequest("User is already a collaborator".to_string())
            }
            ProjectError::CollaboratorNotFound(_) => ApiError::NotFound("Collaborator not found"),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(_) => ApiError::NotFound("Project not found"),
            StorageError::Other(detail) => ApiError::Internal(detail),
        }
    }
}

/// The caller, as identified by the upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|user| !user.is_empty())
            .map(|user| CurrentUser(user.to_string()))
            .ok_or_else(|| ApiError::Unauthorized("No user, authorization denied".to_string()))
    }
}

/// Body of `POST /api/projects/{id}/collaborators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorRequest {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub role: String,
}

impl CollaboratorRequest {
    fn validate(&self) -> Result<Role, ApiError> {
        let mut errors = Vec::new();
        if self.user.trim().is_empty() {
            errors.push("User is required".to_string());
        }
        let role = match self.role.as_str() {
            "viewer" => Some(Role::Viewer),
            "editor" => Some(Role::Editor),
            _ => {
                errors.push("Role must be either viewer or editor".to_string());
                None
            }
        };
        match role {
            Some(role) if errors.is_empty() => Ok(role),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/projects", post(create_project).get(list_projects))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/api/projects/{id}/collaborators", post(add_collaborator))
        .route(
            "/api/projects/{id}/collaborators/{user_id}",
            delete(remove_collaborator),
        )
        .with_state(state)
}

/// Health check
pub async fn health() -> &'static str {
    "ok"
}

pub async fn create_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let record = draft.into_record(user)?;
    let saved = state.store.save(&record).await?;
    info!("Project {} created by {}", saved.id, saved.owner);
    Ok(Json(saved))
}

/// Projects the caller owns, collaborates on, or that are public.
pub async fn list_projects(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<ProjectRecord>>, ApiError> {
    let projects = state.store.list().await?;
    Ok(Json(projects.into_iter().filter(|p| p.can_view(&user)).collect()))
}

pub async fn get_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let project = state.project(&id).await?;
    project.authorize(&user, Access::View)?;
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let mut project = state.project(&id).await?;
    project.authorize(&user, Access::Edit)?;
    update.apply(&mut project);
    Ok(Json(state.store.save(&project).await?))
}

pub async fn delete_project(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let project = state.project(&id).await?;
    project.authorize(&user, Access::Delete)?;
    state.store.delete(project.id).await?;
    info!("Project {} removed", project.id);
    Ok(Json(json!({ "msg": "Project removed" })))
}

pub async fn add_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(request): Json<CollaboratorRequest>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let role = request.validate()?;
    let mut project = state.project(&id).await?;
    project.authorize(&user, Access::AddCollaborator)?;
    project.add_collaborator(request.user.trim(), role)?;
    Ok(Json(state.store.save(&project).await?))
}

pub async fn remove_collaborator(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((id, collaborator)): Path<(String, String)>,
) -> Result<Json<ProjectRecord>, ApiError> {
    let mut project = state.project(&id).await?;
    project.authorize(&user, Access::RemoveCollaborator)?;
    project.remove_collaborator(&collaborator)?;
    Ok(Json(state.store.save(&project).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn user(name: &str) -> CurrentUser {
        CurrentUser(name.to_string())
    }

    fn draft(name: &str) -> ProjectDraft {
        ProjectDraft::new(
            name,
            json!({ "items": [], "canvasSize": { "width": 2000, "height": 1500 } }),
        )
    }

    async fn create(state: &AppState, owner: &str, name: &str) -> ProjectRecord {
        create_project(State(state.clone()), user(owner), Json(draft(name)))
            .await
            .unwrap()
            .0
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_config_addr() {
        assert_eq!(ServerConfig::from_addr_var(None).addr, DEFAULT_ADDR);
        assert_eq!(
            ServerConfig::from_addr_var(Some("127.0.0.1:8080")).addr,
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(ServerConfig::from_addr_var(Some("nonsense")).addr, DEFAULT_ADDR);
    }

    #[tokio::test]
    async fn test_user_header_required() {
        let (mut parts, _) = Request::builder()
            .header(USER_HEADER, "alice")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(
            CurrentUser::from_request_parts(&mut parts, &()).await.unwrap(),
            user("alice")
        );

        let (mut parts, _) = Request::builder().body(()).unwrap().into_parts();
        let err = CurrentUser::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let state = AppState::in_memory();
        let err = create_project(State(state), user("alice"), Json(ProjectDraft::default()))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["msg"], "Name is required");
        assert_eq!(body["errors"][1]["msg"], "Project data is required");
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let state = AppState::in_memory();
        let created = create(&state, "alice", "Gala").await;

        let fetched = get_project(State(state.clone()), user("alice"), Path(created.id.to_string()))
            .await
            .unwrap();
        assert_eq!(fetched.0.name, "Gala");

        let err = get_project(State(state.clone()), user("bob"), Path(created.id.to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        let err = get_project(State(state), user("alice"), Path("not-an-id".into()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_filters_visibility() {
        let state = AppState::in_memory();
        create(&state, "alice", "Private").await;
        let public = create(&state, "bob", "Public").await;
        update_project(
            State(state.clone()),
            user("bob"),
            Path(public.id.to_string()),
            Json(ProjectUpdate {
                is_public: Some(true),
                ..ProjectUpdate::default()
            }),
        )
        .await
        .unwrap();

        let names: Vec<_> = list_projects(State(state.clone()), user("alice"))
            .await
            .unwrap()
            .0
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Public", "Private"]);

        let carol = list_projects(State(state), user("carol")).await.unwrap().0;
        assert_eq!(carol.len(), 1);
    }

    #[tokio::test]
    async fn test_editor_can_update_viewer_cannot() {
        let state = AppState::in_memory();
        let project = create(&state, "alice", "Gala").await;
        let id = project.id.to_string();

        for (name, role) in [("ed", "editor"), ("vi", "viewer")] {
            add_collaborator(
                State(state.clone()),
                user("alice"),
                Path(id.clone()),
                Json(CollaboratorRequest {
                    user: name.into(),
                    role: role.into(),
                }),
            )
            .await
            .unwrap();
        }

        let rename = |name: &str| ProjectUpdate {
            name: Some(name.to_string()),
            ..ProjectUpdate::default()
        };
        let updated = update_project(
            State(state.clone()),
            user("ed"),
            Path(id.clone()),
            Json(rename("Gala 2")),
        )
        .await
        .unwrap();
        assert_eq!(updated.0.name, "Gala 2");
        assert!(updated.0.updated_at >= project.updated_at);

        let err = update_project(State(state), user("vi"), Path(id), Json(rename("Nope")))
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["msg"], "Not authorized to edit this project");
    }

    #[tokio::test]
    async fn test_collaborator_errors() {
        let state = AppState::in_memory();
        let id = create(&state, "alice", "Gala").await.id.to_string();
        let request = || {
            Json(CollaboratorRequest {
                user: "bob".into(),
                role: "editor".into(),
            })
        };

        add_collaborator(State(state.clone()), user("alice"), Path(id.clone()), request())
            .await
            .unwrap();
        let err = add_collaborator(State(state.clone()), user("alice"), Path(id.clone()), request())
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["msg"], "User is already a collaborator");

        let err = add_collaborator(
            State(state.clone()),
            user("alice"),
            Path(id.clone()),
            Json(CollaboratorRequest {
                user: "carol".into(),
                role: "owner".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = add_collaborator(State(state.clone()), user("bob"), Path(id.clone()), request())
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        remove_collaborator(State(state.clone()), user("alice"), Path((id.clone(), "bob".into())))
            .await
            .unwrap();
        let err = remove_collaborator(State(state), user("alice"), Path((id, "bob".into())))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_owner_only() {
        let state = AppState::in_memory();
        let project = create(&state, "alice", "Gala").await;
        let id = project.id.to_string();

        let err = delete_project(State(state.clone()), user("bob"), Path(id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

        let removed = delete_project(State(state.clone()), user("alice"), Path(id))
            .await
            .unwrap();
        assert_eq!(removed.0["msg"], "Project removed");
        assert!(!state.store.exists(project.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
        let _router = app(AppState::in_memory());
    }
}

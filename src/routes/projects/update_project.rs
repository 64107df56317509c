use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    domain::{Project, ProjectAPIError, ProjectId, ProjectInput},
    services::projects,
    AppState,
};

#[tracing::instrument(name = "Update project route handler", skip_all)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ProjectAPIError> {
    let project_id = ProjectId::new(project_id);

    let project =
        projects::update_project(&state, &project_id, request).await?;

    Ok((StatusCode::OK, Json(project)))
}

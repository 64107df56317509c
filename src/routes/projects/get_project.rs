use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    domain::{ProjectAPIError, ProjectId},
    services::projects::{self, ProjectDetails},
    AppState,
};

#[tracing::instrument(name = "Get project route handler", skip_all)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, Json<ProjectDetails>), ProjectAPIError> {
    let project_id = ProjectId::new(project_id);
    tracing::debug!("project_id: {}", project_id.as_ref());

    let details = projects::get_project(&state, &project_id).await?;

    Ok((StatusCode::OK, Json(details)))
}

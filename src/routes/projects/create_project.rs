use axum::{extract::State, http::StatusCode, Json};

use crate::{
    domain::{Project, ProjectAPIError, ProjectInput, UserId},
    services::projects,
    AppState,
};

#[tracing::instrument(name = "Create project route handler", skip_all)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<ProjectInput>,
) -> Result<(StatusCode, Json<Project>), ProjectAPIError> {
    let submitter = match request.user_id {
        Some(user_id) => {
            Some(projects::resolve_person(&state, &UserId::new(user_id)).await?)
        }
        None => None,
    };

    let project =
        projects::create_project(&state, request, submitter.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(project)))
}

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;

use crate::{
    domain::{Person, Project, ProjectAPIError, ProjectInput},
    services::projects,
    utils::auth::get_session_user,
    AppState,
};

#[tracing::instrument(name = "Create project for session user route handler", skip_all)]
pub async fn new_project(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut request): Json<ProjectInput>,
) -> Result<(StatusCode, CookieJar, Json<Project>), ProjectAPIError> {
    let user = get_session_user(&jar)?;
    request.user_id = Some(*user.id.as_ref());

    let person = Person::from_user(&user);
    let project = projects::create_project(&state, request, Some(&person)).await?;

    Ok((StatusCode::CREATED, jar, Json(project)))
}

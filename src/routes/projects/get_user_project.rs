use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    domain::{HackathonId, Person, Project, ProjectAPIError},
    services::projects,
    utils::auth::get_session_user,
    AppState,
};

#[derive(Deserialize)]
pub struct UserProjectQuery {
    hackathon_id: uuid::Uuid,
}

#[tracing::instrument(name = "Get session user's project route handler", skip_all)]
pub async fn get_user_project(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<UserProjectQuery>,
) -> Result<(StatusCode, CookieJar, Json<Option<Project>>), ProjectAPIError> {
    let user = get_session_user(&jar)?;
    let hackathon_id = HackathonId::new(query.hackathon_id);

    let project = projects::get_project_for_user(
        &state,
        &hackathon_id,
        &Person::from_user(&user),
    )
    .await?;

    Ok((StatusCode::OK, jar, Json(project)))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;

use crate::{
    domain::{MemberView, ProjectAPIError, ProjectId},
    services::members,
    utils::auth::get_claims,
    AppState,
};

#[tracing::instrument(name = "Get member list route handler", skip_all)]
pub async fn get_members(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(project_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar, Json<Vec<MemberView>>), ProjectAPIError> {
    let claims = get_claims(&jar)?;
    tracing::debug!("user_id: {}", claims.sub);

    let project_id = ProjectId::new(project_id);
    let member_list =
        members::get_members_by_project_id(&state, &project_id).await?;

    Ok((StatusCode::OK, jar, Json(member_list)))
}

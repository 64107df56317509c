use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{MemberStatus, ProjectAPIError, ProjectId},
    services::members,
    utils::auth::get_session_user,
    AppState,
};

use super::MemberResponse;

#[tracing::instrument(name = "Update member status route handler", skip_all)]
pub async fn update_member_status(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<(StatusCode, CookieJar, Json<UpdateStatusResponse>), ProjectAPIError>
{
    // The session decides whose row changes; any user_id in the body is ignored.
    let user = get_session_user(&jar)?;
    let project_id = ProjectId::new(project_id);

    let change = members::update_status_member(
        &state,
        &user,
        &project_id,
        request.status,
        request.email.as_deref(),
        request.was_in_other_project,
    )
    .await?;

    let response = Json(UpdateStatusResponse {
        member: change.member.into(),
        removed_from_other_projects: change.removed_elsewhere,
    });

    Ok((StatusCode::OK, jar, response))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MemberStatus,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "wasInOtherProject", default)]
    pub was_in_other_project: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub member: MemberResponse,
    #[serde(rename = "removedFromOtherProjects")]
    pub removed_from_other_projects: u64,
}

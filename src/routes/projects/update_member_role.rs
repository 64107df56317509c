use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        Member, MemberId, MemberStatus, ProjectAPIError, ProjectId, RoleUpdate,
        UserId,
    },
    services::members,
    utils::auth::get_claims,
    AppState,
};

#[tracing::instrument(name = "Update member role route handler", skip_all)]
pub async fn update_member_role(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(project_id): Path<uuid::Uuid>,
    Json(request): Json<RoleUpdate>,
) -> Result<(StatusCode, CookieJar, Json<MemberResponse>), ProjectAPIError> {
    get_claims(&jar)?;
    let project_id = ProjectId::new(project_id);

    let member = members::update_role_member(&state, &project_id, request).await?;

    Ok((StatusCode::OK, jar, Json(MemberResponse::from(member))))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub project_id: ProjectId,
    pub user_id: Option<UserId>,
    pub email: Option<String>,
    pub role: String,
    pub status: MemberStatus,
}

impl From<Member> for MemberResponse {
    fn from(member: Member) -> Self {
        Self {
            id: member.id,
            project_id: member.project_id,
            user_id: member.user_id,
            email: member.email.map(|e| e.as_str().to_owned()),
            role: member.role,
            status: member.status,
        }
    }
}

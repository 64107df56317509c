use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    domain::{
        InvitationCheck, MemberId, ProjectAPIError, UserId, ValidationError,
    },
    services::members,
    utils::auth::get_session_user,
    AppState,
};

#[derive(Deserialize)]
pub struct CheckInvitationQuery {
    invitation: uuid::Uuid,
    user_id: Option<uuid::Uuid>,
}

#[tracing::instrument(name = "Check invitation route handler", skip_all)]
pub async fn check_invitation(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CheckInvitationQuery>,
) -> Result<(StatusCode, CookieJar, Json<InvitationCheck>), ProjectAPIError> {
    let user = get_session_user(&jar)?;
    if query.user_id.is_some_and(|id| UserId::new(id) != user.id) {
        return Err(ValidationError::new(
            "user_id must match the signed-in user".to_owned(),
        )
        .into());
    }

    let check =
        members::check_invitation(&state, &MemberId::new(query.invitation), &user)
            .await?;

    Ok((StatusCode::OK, jar, Json(check)))
}

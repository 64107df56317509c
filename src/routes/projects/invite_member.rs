use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;

use crate::{
    domain::{
        InvitationOutcome, InvitationRequest, ProjectAPIError, UserId,
        ValidationError,
    },
    services::members,
    utils::auth::get_session_user,
    AppState,
};

#[tracing::instrument(name = "Invite member route handler", skip_all)]
pub async fn invite_member(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<InvitationRequest>,
) -> Result<(StatusCode, CookieJar, Json<InvitationOutcome>), ProjectAPIError> {
    let inviter = get_session_user(&jar)?;
    if request.user_id.is_some_and(|id| UserId::new(id) != inviter.id) {
        return Err(ValidationError::new(
            "user_id must match the signed-in user".to_owned(),
        )
        .into());
    }

    let outcome = members::generate_invitation(&state, &inviter, request).await?;

    Ok((StatusCode::OK, jar, Json(outcome)))
}

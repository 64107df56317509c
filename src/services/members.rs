use askama::Template;
use color_eyre::eyre::{eyre, Result};

use crate::{
    app_state::AppState,
    domain::{
        Email, ExclusiveConfirmation, HackathonId, InvitationCheck,
        InvitationOutcome, InvitationRequest, Member, MemberId, MemberStatus,
        MemberView, Person, PersonRef, Project, ProjectAPIError, ProjectId,
        ProjectStore, ProjectStoreError, RateLimitStoreError, RoleUpdate,
        User, UserStoreError, ValidationError,
    },
    utils::constants::{invitations, APP_SERVICE_EXTERNAL_ADDRESS},
};

use super::projects::project_error;

#[derive(Template)]
#[template(path = "invitation_email.html")]
struct InvitationEmail<'a> {
    inviter_name: &'a str,
    project_name: &'a str,
    hackathon_title: &'a str,
    link: &'a str,
}

pub fn invitation_link(hackathon_id: &HackathonId, member_id: &MemberId) -> String {
    format!(
        "{}/hackathons/project-submission?hackathon={}&invitation={}",
        APP_SERVICE_EXTERNAL_ADDRESS.trim_end_matches('/'),
        hackathon_id.as_ref(),
        member_id.as_ref()
    )
}

/// Display rows for `members`, skipping Removed ones. Name, email and image
/// come from the linked account, else from the invited address.
#[tracing::instrument(name = "Building member views", skip_all)]
pub async fn member_views(
    state: &AppState,
    members: Vec<Member>,
) -> Result<Vec<MemberView>, ProjectAPIError> {
    let users = state.user_store.read().await;
    let mut views = Vec::with_capacity(members.len());

    for member in members {
        if member.status == MemberStatus::Removed {
            continue;
        }

        let account = match &member.user_id {
            Some(user_id) => match users.get_user(user_id).await {
                Ok(user) => Some(user),
                Err(UserStoreError::UserNotFound) => None,
                Err(e) => return Err(ProjectAPIError::UnexpectedError(eyre!(e))),
            },
            None => None,
        };

        let fallback = member
            .email
            .as_ref()
            .map(|e| e.as_str().to_owned())
            .unwrap_or_default();

        let (name, email, image) = match account {
            Some(user) => (user.name, user.email.as_str().to_owned(), user.image),
            None => (fallback.clone(), fallback, String::new()),
        };

        views.push(MemberView {
            id: member.id,
            user_id: member.user_id,
            name,
            email,
            image,
            role: member.role,
            status: member.status,
        });
    }

    Ok(views)
}

// An invitation row whose email still has to go out.
struct PendingInvite {
    raw: String,
    email: Email,
    member_id: MemberId,
}

/// Invites each address to the inviter's project in a hackathon, creating an
/// untitled draft when the inviter has none yet. Addresses are handled one by
/// one; a bad address or a failed delivery only affects itself.
#[tracing::instrument(name = "Generating invitations", skip_all)]
pub async fn generate_invitation(
    state: &AppState,
    inviter: &User,
    request: InvitationRequest,
) -> Result<InvitationOutcome, ProjectAPIError> {
    state
        .rate_limit_store
        .write()
        .await
        .register_hit(&inviter.id)
        .await
        .map_err(|e| match e {
            RateLimitStoreError::LimitExceeded => ProjectAPIError::RateLimited,
            e => ProjectAPIError::UnexpectedError(eyre!(e)),
        })?;

    request.validate()?;

    let hackathon_id = HackathonId::new(request.hackathon_id);
    let mut outcome = InvitationOutcome::default();

    let mut projects = state.project_store.write().await;

    let hackathon = projects.get_hackathon(&hackathon_id).await.map_err(|e| {
        match e {
            ProjectStoreError::HackathonIDNotFound => {
                ProjectAPIError::IDNotFoundError(request.hackathon_id)
            }
            e => ProjectAPIError::UnexpectedError(eyre!(e)),
        }
    })?;

    let inviter_person = Person::from_user(inviter);
    let existing = projects
        .get_confirmed_projects(&hackathon_id, &inviter_person)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?
        .into_iter()
        .next();

    let project = match existing {
        Some(project) => project,
        None => {
            let project = Project::untitled(hackathon_id.clone());
            let creator = Member::new(
                project.id.clone(),
                Some(inviter.id.clone()),
                Some(inviter.email.clone()),
                MemberStatus::Confirmed,
            );
            projects
                .add_project(&project, Some(&creator))
                .await
                .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;
            project
        }
    };
    outcome.project_id = Some(project.id.clone());

    let mut pending = Vec::new();
    for raw in request.emails {
        let email = match Email::parse_str(&raw) {
            Ok(email) => email,
            Err(e) => {
                tracing::debug!("Skipping invitation: {}", e);
                outcome.failed.push(raw);
                continue;
            }
        };

        match upsert_invitation(state, &mut *projects, inviter, &project, &email)
            .await
        {
            Ok(Some(member_id)) => pending.push(PendingInvite {
                raw,
                email,
                member_id,
            }),
            Ok(None) => outcome.skipped.push(raw),
            Err(e) => {
                tracing::error!("Failed to record invitation: {:?}", e);
                outcome.failed.push(raw);
            }
        }
    }

    // Rows are in place; delivery does not need the store.
    drop(projects);

    for invite in pending {
        let link = invitation_link(&hackathon_id, &invite.member_id);
        let sent = send_invitation_email(
            state,
            &invite.email,
            &inviter.name,
            &project.project_name,
            &hackathon.title,
            &link,
        )
        .await;

        match sent {
            Ok(()) => outcome.invited.push(invite.raw),
            Err(e) => {
                tracing::error!("Failed to send invitation: {:?}", e);
                outcome.failed.push(invite.raw);
            }
        }
    }

    Ok(outcome)
}

/// Records a pending invitation for `email` in `project`. Returns the member
/// row to notify, or `None` when the address is skipped.
async fn upsert_invitation(
    state: &AppState,
    projects: &mut (dyn ProjectStore + Send + Sync),
    inviter: &User,
    project: &Project,
    email: &Email,
) -> Result<Option<MemberId>> {
    if email == &inviter.email {
        return Ok(None);
    }

    let account = match state.user_store.read().await.get_user_by_email(email).await {
        Ok(user) => Some(user),
        Err(UserStoreError::UserNotFound) => None,
        Err(e) => return Err(eyre!(e)),
    };

    if account.as_ref().is_some_and(|user| user.id == inviter.id) {
        return Ok(None);
    }

    let person = match &account {
        Some(user) => Person::from_user(user),
        None => Person::by_email(email.clone()),
    };

    match projects.find_member(&project.id, &person).await? {
        Some(member) if member.status == MemberStatus::Confirmed => Ok(None),
        Some(mut member) => {
            member.status = MemberStatus::PendingConfirmation;
            if member.user_id.is_none() {
                member.user_id = account.map(|user| user.id);
            }
            if member.email.is_none() {
                member.email = Some(email.clone());
            }
            projects.update_member_status(&member, None).await?;
            Ok(Some(member.id))
        }
        None => {
            let member = Member::new(
                project.id.clone(),
                account.map(|user| user.id),
                Some(email.clone()),
                MemberStatus::PendingConfirmation,
            );
            projects.add_member(&member).await?;
            Ok(Some(member.id))
        }
    }
}

#[tracing::instrument(name = "Sending invitation email", skip_all)]
async fn send_invitation_email(
    state: &AppState,
    recipient: &Email,
    inviter_name: &str,
    project_name: &str,
    hackathon_title: &str,
    link: &str,
) -> Result<()> {
    let html_body = InvitationEmail {
        inviter_name,
        project_name,
        hackathon_title,
        link,
    }
    .render()?;

    let text_body = format!(
        "{inviter_name} invited you to join {project_name} in {hackathon_title}.\n\
         Accept the invitation here: {link}"
    );

    state
        .email_client
        .send_email(recipient, invitations::EMAIL_SUBJECT, &html_body, &text_body)
        .await
}

/// Describes an invitation as seen by `user`. Rows that belong to someone
/// else are reported as missing.
#[tracing::instrument(name = "Checking invitation", skip_all)]
pub async fn check_invitation(
    state: &AppState,
    invitation_id: &MemberId,
    user: &User,
) -> Result<InvitationCheck, ProjectAPIError> {
    let projects = state.project_store.read().await;
    let person = Person::from_user(user);

    let member = match projects.get_member(invitation_id).await {
        Ok(member) if person.matches(&member) => member,
        Ok(_) | Err(ProjectStoreError::MemberIDNotFound) => {
            return Ok(InvitationCheck::default())
        }
        Err(e) => return Err(ProjectAPIError::UnexpectedError(eyre!(e))),
    };

    let project = projects
        .get_project(&member.project_id)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    let conflicting = projects
        .get_confirmed_projects(&project.hackathon_id, &person)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?
        .into_iter()
        .find(|p| p.id != project.id);

    Ok(InvitationCheck {
        exists: true,
        is_confirming: member.status == MemberStatus::PendingConfirmation
            && conflicting.is_none(),
        has_confirmed_project: conflicting.is_some(),
        project_id: Some(project.id),
        project_name: Some(project.project_name),
        confirmed_project_name: conflicting.map(|p| p.project_name),
    })
}

/// Result of a status change: the updated row and how many confirmations in
/// sibling projects were removed alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub member: Member,
    pub removed_elsewhere: u64,
}

/// Moves the caller's row in `project_id` to `status`. The row is found by
/// the session account or by `email`, preferring a row linked to the account.
/// `email` only finds rows no account is linked to yet.
/// Confirming, or passing `was_in_other_project`, also removes the caller's
/// confirmations in the hackathon's other projects in the same unit of work.
#[tracing::instrument(name = "Updating member status", skip_all)]
pub async fn update_status_member(
    state: &AppState,
    user: &User,
    project_id: &ProjectId,
    status: MemberStatus,
    email: Option<&str>,
    was_in_other_project: bool,
) -> Result<StatusChange, ProjectAPIError> {
    let mut person = Person::from_user(user);
    if let Some(raw) = email.filter(|e| !e.trim().is_empty()) {
        person = person.with(PersonRef::ByEmail(Email::parse_str(raw)?));
    }
    if person.is_empty() {
        let error = ValidationError::new("A user id or email is required".to_owned());
        return Err(error.into());
    }

    let mut projects = state.project_store.write().await;

    let project = projects
        .get_project(project_id)
        .await
        .map_err(|e| project_error(e, project_id))?;

    let mut member = projects
        .find_member(project_id, &person)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?
        .ok_or_else(|| {
            ValidationError::new("No membership found for this project".to_owned())
        })?;

    // Removed is only reached when another project is confirmed.
    if status == MemberStatus::Removed || !member.status.can_transition_to(status) {
        let error = ValidationError::new(format!(
            "Cannot change membership status from {} to {}",
            member.status, status
        ));
        return Err(error.into());
    }

    member.status = status;
    if member.user_id.is_none() {
        member.user_id = Some(user.id.clone());
    }
    if member.email.is_none() {
        member.email = Some(user.email.clone());
    }

    let exclusive = (was_in_other_project || status == MemberStatus::Confirmed)
        .then_some(ExclusiveConfirmation {
            hackathon_id: &project.hackathon_id,
            person: &person,
        });

    let removed_elsewhere = projects
        .update_member_status(&member, exclusive)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    if removed_elsewhere > 0 {
        tracing::info!(
            "Removed {} confirmation(s) in other projects of hackathon {}",
            removed_elsewhere,
            project.hackathon_id.as_ref()
        );
    }

    Ok(StatusChange {
        member,
        removed_elsewhere,
    })
}

#[tracing::instrument(name = "Getting members by project", skip_all)]
pub async fn get_members_by_project_id(
    state: &AppState,
    project_id: &ProjectId,
) -> Result<Vec<MemberView>, ProjectAPIError> {
    let members = {
        let projects = state.project_store.read().await;
        projects
            .get_project(project_id)
            .await
            .map_err(|e| project_error(e, project_id))?;
        projects
            .get_members(project_id)
            .await
            .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?
    };

    member_views(state, members).await
}

/// Changes the role of a member of `project_id`. Status is left alone.
#[tracing::instrument(name = "Updating member role", skip_all)]
pub async fn update_role_member(
    state: &AppState,
    project_id: &ProjectId,
    update: RoleUpdate,
) -> Result<Member, ProjectAPIError> {
    update.validate()?;

    let mut projects = state.project_store.write().await;
    let not_found = || ProjectAPIError::IDNotFoundError(*update.member_id.as_ref());

    let mut member = projects
        .get_member(&update.member_id)
        .await
        .map_err(|e| match e {
            ProjectStoreError::MemberIDNotFound => not_found(),
            e => ProjectAPIError::UnexpectedError(eyre!(e)),
        })?;

    if &member.project_id != project_id {
        return Err(not_found());
    }

    let role = update.role.trim().to_owned();
    projects
        .update_member_role(&member.id, &role)
        .await
        .map_err(|e| match e {
            ProjectStoreError::MemberIDNotFound => not_found(),
            e => ProjectAPIError::UnexpectedError(eyre!(e)),
        })?;

    member.role = role;
    Ok(member)
}

use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        Hackathon, HackathonId, Member, MemberStatus, MemberView, Pagination,
        Person, PersonRef, Prize, Project, ProjectAPIError, ProjectFilter,
        ProjectId, ProjectInput, ProjectPage, ProjectStoreError, UserId,
        UserStoreError,
    },
};

use super::members::member_views;

/// A project with everything a detail page shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub hackathon: Hackathon,
    pub members: Vec<MemberView>,
    pub prizes: Vec<Prize>,
}

/// Resolves a user id from a request body into every reference known for
/// that person. Unknown accounts are matched by id only.
#[tracing::instrument(name = "Resolving person", skip_all)]
pub async fn resolve_person(
    state: &AppState,
    user_id: &UserId,
) -> Result<Person, ProjectAPIError> {
    match state.user_store.read().await.get_user(user_id).await {
        Ok(user) => Ok(Person::from_user(&user)),
        Err(UserStoreError::UserNotFound) => {
            Ok(Person::default().with(PersonRef::ById(user_id.clone())))
        }
        Err(e) => Err(ProjectAPIError::UnexpectedError(eyre!(e))),
    }
}

/// Creates a project, or overwrites the one `submitter` is already confirmed
/// on in the same hackathon. The lookup is explicit: nothing in storage
/// enforces one project per submitter.
#[tracing::instrument(name = "Creating project", skip_all)]
pub async fn create_project(
    state: &AppState,
    input: ProjectInput,
    submitter: Option<&Person>,
) -> Result<Project, ProjectAPIError> {
    input.validate()?;
    let hackathon_id = input.hackathon_id.map(HackathonId::new).ok_or_else(|| {
        ProjectAPIError::BadRequest("hackaton_id is required".to_owned())
    })?;

    let mut projects = state.project_store.write().await;

    projects
        .get_hackathon(&hackathon_id)
        .await
        .map_err(|e| hackathon_error(e, &hackathon_id))?;

    let existing = match submitter {
        Some(person) => projects
            .get_confirmed_projects(&hackathon_id, person)
            .await
            .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?
            .into_iter()
            .next(),
        None => None,
    };

    if let Some(mut project) = existing {
        tracing::debug!("Overwriting project {}", project.id.as_ref());
        project.replace_with(input);
        projects
            .update_project(&project)
            .await
            .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;
        return Ok(project);
    }

    let project = Project::new(hackathon_id, input);
    let creator = submitter.map(|person| {
        Member::new(
            project.id.clone(),
            person.primary_user_id(),
            person.primary_email(),
            MemberStatus::Confirmed,
        )
    });

    projects
        .add_project(&project, creator.as_ref())
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    Ok(project)
}

#[tracing::instrument(name = "Getting project", skip_all)]
pub async fn get_project(
    state: &AppState,
    project_id: &ProjectId,
) -> Result<ProjectDetails, ProjectAPIError> {
    let projects = state.project_store.read().await;

    let project = projects
        .get_project(project_id)
        .await
        .map_err(|e| project_error(e, project_id))?;
    let hackathon = projects
        .get_hackathon(&project.hackathon_id)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;
    let members = projects
        .get_members(project_id)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;
    let prizes = projects
        .get_prizes(project_id)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    let members = member_views(state, members).await?;

    Ok(ProjectDetails {
        project,
        hackathon,
        members,
        prizes,
    })
}

/// The project `person` is confirmed on in a hackathon, if any.
#[tracing::instrument(name = "Getting project for user", skip_all)]
pub async fn get_project_for_user(
    state: &AppState,
    hackathon_id: &HackathonId,
    person: &Person,
) -> Result<Option<Project>, ProjectAPIError> {
    let confirmed = state
        .project_store
        .read()
        .await
        .get_confirmed_projects(hackathon_id, person)
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    Ok(confirmed.into_iter().next())
}

#[tracing::instrument(name = "Getting filtered projects", skip_all)]
pub async fn get_filtered_projects(
    state: &AppState,
    filter: &ProjectFilter,
    page: i64,
    page_size: i64,
) -> Result<ProjectPage, ProjectAPIError> {
    let pagination = Pagination::new(page, page_size)?;

    let (projects, total) = state
        .project_store
        .read()
        .await
        .search_projects(filter, pagination.page_size(), pagination.offset())
        .await
        .map_err(|e| ProjectAPIError::UnexpectedError(eyre!(e)))?;

    Ok(ProjectPage {
        projects,
        total,
        page: pagination.page(),
        page_size: pagination.page_size(),
    })
}

/// Replaces every submitted field of an existing project. The project stays
/// in its hackathon whatever the body says.
#[tracing::instrument(name = "Updating project", skip_all)]
pub async fn update_project(
    state: &AppState,
    project_id: &ProjectId,
    input: ProjectInput,
) -> Result<Project, ProjectAPIError> {
    input.validate()?;

    let mut projects = state.project_store.write().await;

    let mut project = projects
        .get_project(project_id)
        .await
        .map_err(|e| project_error(e, project_id))?;

    project.replace_with(input);

    projects
        .update_project(&project)
        .await
        .map_err(|e| project_error(e, project_id))?;

    Ok(project)
}

fn hackathon_error(e: ProjectStoreError, id: &HackathonId) -> ProjectAPIError {
    match e {
        ProjectStoreError::HackathonIDNotFound => {
            ProjectAPIError::IDNotFoundError(*id.as_ref())
        }
        e => ProjectAPIError::UnexpectedError(eyre!(e)),
    }
}

pub(crate) fn project_error(
    e: ProjectStoreError,
    id: &ProjectId,
) -> ProjectAPIError {
    match e {
        ProjectStoreError::ProjectIDNotFound => {
            ProjectAPIError::IDNotFoundError(*id.as_ref())
        }
        e => ProjectAPIError::UnexpectedError(eyre!(e)),
    }
}

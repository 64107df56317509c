use super::{
    Email, Hackathon, HackathonId, Member, MemberId, Person, Prize, Project,
    ProjectFilter, ProjectId, User, UserId,
};
use color_eyre::eyre::Report;
use thiserror::Error;

#[async_trait::async_trait]
pub trait UserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError>;
    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError>;
}

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UserAlreadyExists, Self::UserAlreadyExists)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Scope of a confirmation that must stay exclusive: every other Confirmed
/// row of `person` in projects of `hackathon_id` is demoted to Removed.
#[derive(Debug, Clone, Copy)]
pub struct ExclusiveConfirmation<'a> {
    pub hackathon_id: &'a HackathonId,
    pub person: &'a Person,
}

/// Projects, their members and prizes, and the hackathons they belong to.
///
/// Methods that write more than one row are atomic.
#[async_trait::async_trait]
pub trait ProjectStore {
    async fn add_hackathon(
        &mut self,
        hackathon: &Hackathon,
    ) -> Result<(), ProjectStoreError>;
    async fn get_hackathon(
        &self,
        hackathon_id: &HackathonId,
    ) -> Result<Hackathon, ProjectStoreError>;

    /// Inserts a project together with its first member.
    async fn add_project(
        &mut self,
        project: &Project,
        creator: Option<&Member>,
    ) -> Result<(), ProjectStoreError>;
    async fn get_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Project, ProjectStoreError>;
    async fn update_project(
        &mut self,
        project: &Project,
    ) -> Result<(), ProjectStoreError>;
    /// Projects of a hackathon where `person` holds a Confirmed membership,
    /// oldest first.
    async fn get_confirmed_projects(
        &self,
        hackathon_id: &HackathonId,
        person: &Person,
    ) -> Result<Vec<Project>, ProjectStoreError>;
    /// One page of matching projects, newest first, plus the total number of
    /// matches.
    async fn search_projects(
        &self,
        filter: &ProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), ProjectStoreError>;

    async fn add_prize(&mut self, prize: &Prize) -> Result<(), ProjectStoreError>;
    async fn get_prizes(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Prize>, ProjectStoreError>;

    async fn add_member(&mut self, member: &Member)
        -> Result<(), ProjectStoreError>;
    async fn get_member(
        &self,
        member_id: &MemberId,
    ) -> Result<Member, ProjectStoreError>;
    /// Every member row of the project, Removed included, in insertion order.
    async fn get_members(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Member>, ProjectStoreError>;
    /// The project's row for `person`, preferring a row linked by user id.
    async fn find_member(
        &self,
        project_id: &ProjectId,
        person: &Person,
    ) -> Result<Option<Member>, ProjectStoreError>;
    /// Overwrites user link, email and status of an existing row. With
    /// `exclusive` set, sibling confirmations are demoted in the same
    /// unit of work. Returns the number of demoted rows.
    async fn update_member_status(
        &mut self,
        member: &Member,
        exclusive: Option<ExclusiveConfirmation<'_>>,
    ) -> Result<u64, ProjectStoreError>;
    async fn update_member_role(
        &mut self,
        member_id: &MemberId,
        role: &str,
    ) -> Result<(), ProjectStoreError>;
}

#[derive(Debug, Error)]
pub enum ProjectStoreError {
    #[error("Hackathon ID not found")]
    HackathonIDNotFound,
    #[error("Member ID exists")]
    MemberIDExists,
    #[error("Member ID not found")]
    MemberIDNotFound,
    #[error("Project ID exists")]
    ProjectIDExists,
    #[error("Project ID not found")]
    ProjectIDNotFound,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ProjectStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::HackathonIDNotFound, Self::HackathonIDNotFound)
                | (Self::MemberIDExists, Self::MemberIDExists)
                | (Self::MemberIDNotFound, Self::MemberIDNotFound)
                | (Self::ProjectIDExists, Self::ProjectIDExists)
                | (Self::ProjectIDNotFound, Self::ProjectIDNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Fixed-window request counter keyed by user.
#[async_trait::async_trait]
pub trait RateLimitStore {
    async fn register_hit(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), RateLimitStoreError>;
}

#[derive(Debug, Error)]
pub enum RateLimitStoreError {
    #[error("Rate limit exceeded")]
    LimitExceeded,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for RateLimitStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::LimitExceeded, Self::LimitExceeded)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

mod check_invitation;
mod create_project;
mod get_members;
mod get_project;
mod get_user_project;
mod invite_member;
mod list_projects;
mod new_project;
mod update_member_role;
mod update_member_status;
mod update_project;

pub use check_invitation::check_invitation;
pub use create_project::create_project;
pub use get_members::get_members;
pub use get_project::get_project;
pub use get_user_project::get_user_project;
pub use invite_member::invite_member;
pub use list_projects::{list_projects, ListProjectsQuery};
pub use new_project::new_project;
pub use update_member_role::{update_member_role, MemberResponse};
pub use update_member_status::{
    update_member_status, UpdateStatusRequest, UpdateStatusResponse,
};
pub use update_project::update_project;

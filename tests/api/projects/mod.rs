mod check_invitation;
mod create;
mod get;
mod list;
mod member_status;
mod members;
mod update;
mod user_project;

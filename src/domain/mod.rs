mod data_stores;
mod email;
mod email_client;
mod error;
mod hackathon;
mod invitation;
mod member;
mod member_id;
mod person;
mod project;
mod project_id;
mod user;
mod user_id;
mod validation;

pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use error::*;
pub use hackathon::*;
pub use invitation::*;
pub use member::*;
pub use member_id::*;
pub use person::*;
pub use project::*;
pub use project_id::*;
pub use user::*;
pub use user_id::*;
pub use validation::*;

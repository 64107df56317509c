use super::{Email, UserId};

/// An account mirrored from the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub image: String,
}

impl User {
    pub fn new(email: Email, name: &str) -> Self {
        Self {
            id: UserId::default(),
            email,
            name: name.to_owned(),
            image: String::new(),
        }
    }
}

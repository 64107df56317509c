use crate::domain::{Email, User, UserId, UserStore, UserStoreError};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<UserId, User>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        let taken = self.users.contains_key(&user.id)
            || self.users.values().any(|u| u.email == user.email);

        if taken {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        match self.users.get(id) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|u| &u.email == email)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }
}

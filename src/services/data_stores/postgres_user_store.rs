use color_eyre::eyre::eyre;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Email, User, UserId, UserStore, UserStoreError};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    image: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::new(row.id),
            email: Email::parse_str(&row.email)
                .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
            name: row.name,
            image: row.image,
        })
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, image) VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.as_ref())
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.image)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user by ID from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, UserStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
                    SELECT id, email, name, image
                    FROM users
                    WHERE id = $1
                    "#,
        )
        .bind(id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?
        .try_into()
    }

    #[tracing::instrument(
        name = "Retrieving user by email from PostgreSQL",
        skip_all
    )]
    async fn get_user_by_email(
        &self,
        email: &Email,
    ) -> Result<User, UserStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
                    SELECT id, email, name, image
                    FROM users
                    WHERE lower(email) = $1
                    "#,
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?
        .try_into()
    }
}

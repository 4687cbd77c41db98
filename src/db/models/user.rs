//! User account model.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("Username already exists")]
    DuplicateName,
    #[error("Email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl User {
    /// Insert a new account. Duplicate detection is the UNIQUE constraint
    /// itself: the insert races to the database and the violated column
    /// determines which error the caller sees.
    pub async fn create(
        pool: &SqlitePool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, password_hash, created_at) \
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(&now)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed: users.name") {
                    Err(CreateUserError::DuplicateName)
                } else if msg.contains("UNIQUE constraint failed: users.email") {
                    Err(CreateUserError::DuplicateEmail)
                } else {
                    Err(CreateUserError::Database(sqlx::Error::Database(db_err)))
                }
            }
            Err(e) => Err(CreateUserError::Database(e)),
        }
    }

    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}

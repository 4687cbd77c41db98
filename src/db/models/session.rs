//! Server-side session model.
//!
//! The browser cookie carries a random bearer token; only its SHA-256 digest
//! is stored here. A row's presence is the authentication marker, and the
//! last predicted crop rides on the same row, so deleting it at logout clears
//! both at once.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub user_name: String,
    pub token_hash: String,
    pub last_crop: Option<String>,
    pub expires_at: String,
    pub created_at: String,
}

impl Session {
    pub async fn create(
        pool: &SqlitePool,
        user_name: &str,
        token_hash: &str,
        ttl_hours: i64,
    ) -> Result<Session, sqlx::Error> {
        let now = chrono::Utc::now();
        let expires_at = (now + chrono::Duration::hours(ttl_hours)).to_rfc3339();
        let session = Session {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            token_hash: token_hash.to_string(),
            last_crop: None,
            expires_at,
            created_at: now.to_rfc3339(),
        };

        sqlx::query(
            "INSERT INTO sessions (id, user_name, token_hash, last_crop, expires_at, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&session.id)
        .bind(&session.user_name)
        .bind(&session.token_hash)
        .bind(&session.last_crop)
        .bind(&session.expires_at)
        .bind(&session.created_at)
        .execute(pool)
        .await?;

        Ok(session)
    }

    /// Look up a live session by token hash. Expiry is checked here rather
    /// than in SQL: the stored timestamps are RFC 3339 and do not collate
    /// with SQLite's datetime('now') format.
    pub async fn find_live(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Session>, sqlx::Error> {
        let session: Option<Session> = sqlx::query_as("SELECT * FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(pool)
            .await?;

        Ok(session.filter(Session::is_live))
    }

    pub fn is_live(&self) -> bool {
        chrono::DateTime::parse_from_rfc3339(&self.expires_at)
            .map(|exp| exp.with_timezone(&chrono::Utc) > chrono::Utc::now())
            .unwrap_or(false)
    }

    /// Record the most recent prediction for this session.
    pub async fn set_last_crop(&self, pool: &SqlitePool, crop: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE sessions SET last_crop = ? WHERE id = ?")
            .bind(crop)
            .bind(&self.id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(&self.id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_timestamp_is_not_live() {
        let mut session = Session {
            id: "s".to_string(),
            user_name: "u".to_string(),
            token_hash: "h".to_string(),
            last_crop: None,
            expires_at: "2000-01-01T00:00:00+00:00".to_string(),
            created_at: "2000-01-01T00:00:00+00:00".to_string(),
        };
        assert!(!session.is_live());

        session.expires_at = (chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339();
        assert!(session.is_live());
    }

    #[test]
    fn garbage_timestamp_is_not_live() {
        let session = Session {
            id: "s".to_string(),
            user_name: "u".to_string(),
            token_hash: "h".to_string(),
            last_crop: None,
            expires_at: "not-a-date".to_string(),
            created_at: "not-a-date".to_string(),
        };
        assert!(!session.is_live());
    }
}

//! User mirror repository

use sqlx::PgPool;

use crate::{DbError, DbResult, DbUser};

/// Repository for the account mirror table
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a mirror row for a newly registered account
    pub async fn create(&self, sub: &str, username: &str, email: &str) -> DbResult<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (sub, username, email)
            VALUES ($1, $2, $3)
            RETURNING sub, username, email, password_hash, enabled, created_at
            "#,
        )
        .bind(sub)
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return DbError::Duplicate(format!("User {} already exists", username));
                }
            }
            DbError::Query(e)
        })?;

        Ok(user)
    }

    /// Find a user by principal id
    pub async fn find_by_sub(&self, sub: &str) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT sub, username, email, password_hash, enabled, created_at
            FROM users
            WHERE sub = $1
            "#,
        )
        .bind(sub)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT sub, username, email, password_hash, enabled, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Enable or disable an account mirror
    pub async fn set_enabled(&self, sub: &str, enabled: bool) -> DbResult<()> {
        sqlx::query("UPDATE users SET enabled = $2 WHERE sub = $1")
            .bind(sub)
            .bind(enabled)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store a password hash (local auth strategy only)
    pub async fn set_password_hash(&self, sub: &str, password_hash: &str) -> DbResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE sub = $1")
            .bind(sub)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

//! Random item repository
//!
//! Every query is keyed by `owner_sub`; one principal can never read or
//! write another's rows through this interface.

use sqlx::PgPool;

use crate::{DbResult, DbRandomItem};

/// Repository for random items
pub struct ItemRepo {
    pool: PgPool,
}

impl ItemRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new item for an owner
    pub async fn create(
        &self,
        owner_sub: &str,
        min_value: i64,
        max_value: i64,
        num: i64,
    ) -> DbResult<DbRandomItem> {
        let item = sqlx::query_as::<_, DbRandomItem>(
            r#"
            INSERT INTO random_items (owner_sub, min_value, max_value, num)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_sub, min_value, max_value, num, created_at, updated_at
            "#,
        )
        .bind(owner_sub)
        .bind(min_value)
        .bind(max_value)
        .bind(num)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Find one of the owner's items
    pub async fn find(&self, id: i64, owner_sub: &str) -> DbResult<Option<DbRandomItem>> {
        let item = sqlx::query_as::<_, DbRandomItem>(
            r#"
            SELECT id, owner_sub, min_value, max_value, num, created_at, updated_at
            FROM random_items
            WHERE id = $1 AND owner_sub = $2
            "#,
        )
        .bind(id)
        .bind(owner_sub)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// List the owner's items, oldest first
    pub async fn list(
        &self,
        owner_sub: &str,
        offset: i64,
        limit: i64,
    ) -> DbResult<Vec<DbRandomItem>> {
        let items = sqlx::query_as::<_, DbRandomItem>(
            r#"
            SELECT id, owner_sub, min_value, max_value, num, created_at, updated_at
            FROM random_items
            WHERE owner_sub = $1
            ORDER BY id
            OFFSET $2
            LIMIT $3
            "#,
        )
        .bind(owner_sub)
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Rewrite an item's bounds and value
    pub async fn update(
        &self,
        id: i64,
        owner_sub: &str,
        min_value: i64,
        max_value: i64,
        num: i64,
    ) -> DbResult<Option<DbRandomItem>> {
        let item = sqlx::query_as::<_, DbRandomItem>(
            r#"
            UPDATE random_items
            SET min_value = $3, max_value = $4, num = $5, updated_at = NOW()
            WHERE id = $1 AND owner_sub = $2
            RETURNING id, owner_sub, min_value, max_value, num, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(owner_sub)
        .bind(min_value)
        .bind(max_value)
        .bind(num)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Delete one of the owner's items; returns whether a row was removed
    pub async fn delete(&self, id: i64, owner_sub: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM random_items WHERE id = $1 AND owner_sub = $2")
            .bind(id)
            .bind(owner_sub)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

//! Database row types

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Mirror row for a pool-registered account
///
/// The pool is the source of truth for credentials and confirmation state;
/// this row exists so items can be keyed to an owner and profiles served
/// without a provider round trip.
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    /// Pool-assigned principal id
    pub sub: String,
    pub username: String,
    pub email: String,
    /// Populated only by the local auth strategy
    pub password_hash: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// A stored random item
#[derive(Debug, Clone, FromRow)]
pub struct DbRandomItem {
    pub id: i64,
    pub owner_sub: String,
    pub min_value: i64,
    pub max_value: i64,
    pub num: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//! Request/response DTOs

pub mod items;
pub mod users;

pub use items::*;
pub use users::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Advisory response carrying only a detail message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetailResponse {
    /// Human-readable detail
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

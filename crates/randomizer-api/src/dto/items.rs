//! Random item DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use randomizer_db::DbRandomItem;

/// Create request: inclusive bounds for the drawn value
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRandomItemRequest {
    pub min_value: i64,
    pub max_value: i64,
}

/// Partial update: either bound may be supplied
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRandomItemRequest {
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
}

impl UpdateRandomItemRequest {
    /// Whether the request changes anything at all
    pub fn is_empty(&self) -> bool {
        self.min_value.is_none() && self.max_value.is_none()
    }
}

/// Stored random item
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RandomItemResponse {
    pub id: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub num: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbRandomItem> for RandomItemResponse {
    fn from(item: DbRandomItem) -> Self {
        Self {
            id: item.id,
            min_value: item.min_value,
            max_value: item.max_value,
            num: item.num,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// List pagination parameters
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ListParams {
    /// Rows to skip
    #[serde(default)]
    pub offset: i64,
    /// Page size, at most 100
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

/// Delete acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_camel_case() {
        let json = r#"{"minValue":1,"maxValue":10}"#;
        let request: CreateRandomItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.min_value, 1);
        assert_eq!(request.max_value, 10);
    }

    #[test]
    fn test_update_request_partial_fields() {
        let json = r#"{"maxValue":42}"#;
        let request: UpdateRandomItemRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.min_value, None);
        assert_eq!(request.max_value, Some(42));
        assert!(!request.is_empty());

        let empty: UpdateRandomItemRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_list_params_defaults() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.offset, 0);
        assert_eq!(params.limit, 100);
    }
}

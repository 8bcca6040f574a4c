//! Random item handlers
//!
//! Every query is keyed by the caller's principal id, so one user can
//! never observe or mutate another user's items. Changing either bound
//! redraws the stored value.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use rand::Rng;
use std::sync::Arc;

use crate::dto::{
    CreateRandomItemRequest, DeleteResponse, ListParams, RandomItemResponse,
    UpdateRandomItemRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::RequireItemsScope;
use crate::state::AppState;

const MAX_PAGE_SIZE: i64 = 100;

/// Draw a value uniformly from the inclusive range [min, max].
fn draw_value(min: i64, max: i64) -> i64 {
    rand::thread_rng().gen_range(min..=max)
}

fn check_bounds(min: i64, max: i64) -> Result<(), ApiError> {
    if min > max {
        return Err(ApiError::Validation(
            "minValue must be less than or equal to maxValue".to_string(),
        ));
    }
    Ok(())
}

/// List the caller's random items
#[utoipa::path(
    get,
    path = "/randoms",
    tag = "Randoms",
    security(("bearer" = [])),
    params(
        ("offset" = Option<i64>, Query, description = "Rows to skip"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100")
    ),
    responses(
        (status = 200, description = "Items owned by the caller", body = [RandomItemResponse]),
        (status = 400, description = "Invalid pagination"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    RequireItemsScope(claims): RequireItemsScope,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<RandomItemResponse>>> {
    if params.offset < 0 {
        return Err(ApiError::Validation("offset must not be negative".to_string()));
    }
    if params.limit < 1 || params.limit > MAX_PAGE_SIZE {
        return Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let items = state
        .db
        .item_repo()
        .list(&claims.sub, params.offset, params.limit)
        .await?;

    Ok(Json(items.into_iter().map(RandomItemResponse::from).collect()))
}

/// Create a random item
#[utoipa::path(
    post,
    path = "/randoms",
    tag = "Randoms",
    security(("bearer" = [])),
    request_body = CreateRandomItemRequest,
    responses(
        (status = 200, description = "Item created", body = RandomItemResponse),
        (status = 400, description = "Invalid bounds"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    RequireItemsScope(claims): RequireItemsScope,
    Json(request): Json<CreateRandomItemRequest>,
) -> ApiResult<Json<RandomItemResponse>> {
    check_bounds(request.min_value, request.max_value)?;

    let num = draw_value(request.min_value, request.max_value);
    let item = state
        .db
        .item_repo()
        .create(&claims.sub, request.min_value, request.max_value, num)
        .await?;

    tracing::info!(owner = %claims.sub, item_id = item.id, "Random item created");

    Ok(Json(RandomItemResponse::from(item)))
}

/// Fetch one of the caller's random items
#[utoipa::path(
    get,
    path = "/randoms/{id}",
    tag = "Randoms",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = RandomItemResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Random item not found")
    )
)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    RequireItemsScope(claims): RequireItemsScope,
    Path(id): Path<i64>,
) -> ApiResult<Json<RandomItemResponse>> {
    let item = state
        .db
        .item_repo()
        .find(id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Random item not found".to_string()))?;

    Ok(Json(RandomItemResponse::from(item)))
}

/// Update the bounds of a random item
///
/// An empty patch is a no-op that returns the item unchanged. Supplying
/// either bound redraws the stored value against the merged range.
#[utoipa::path(
    patch,
    path = "/randoms/{id}",
    tag = "Randoms",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Item id")
    ),
    request_body = UpdateRandomItemRequest,
    responses(
        (status = 200, description = "Item updated", body = RandomItemResponse),
        (status = 400, description = "Invalid bounds"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Random item not found")
    )
)]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    RequireItemsScope(claims): RequireItemsScope,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRandomItemRequest>,
) -> ApiResult<Json<RandomItemResponse>> {
    let existing = state
        .db
        .item_repo()
        .find(id, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Random item not found".to_string()))?;

    if request.is_empty() {
        return Ok(Json(RandomItemResponse::from(existing)));
    }

    let min = request.min_value.unwrap_or(existing.min_value);
    let max = request.max_value.unwrap_or(existing.max_value);
    check_bounds(min, max)?;

    let num = draw_value(min, max);
    let item = state
        .db
        .item_repo()
        .update(id, &claims.sub, min, max, num)
        .await?
        .ok_or_else(|| ApiError::NotFound("Random item not found".to_string()))?;

    Ok(Json(RandomItemResponse::from(item)))
}

/// Delete one of the caller's random items
#[utoipa::path(
    delete,
    path = "/randoms/{id}",
    tag = "Randoms",
    security(("bearer" = [])),
    params(
        ("id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item deleted", body = DeleteResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Random item not found")
    )
)]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    RequireItemsScope(claims): RequireItemsScope,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.db.item_repo().delete(id, &claims.sub).await?;
    if !deleted {
        return Err(ApiError::NotFound("Random item not found".to_string()));
    }

    tracing::info!(owner = %claims.sub, item_id = id, "Random item deleted");

    Ok(Json(DeleteResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_value_stays_within_inclusive_bounds() {
        for _ in 0..1000 {
            let num = draw_value(1, 10);
            assert!((1..=10).contains(&num));
        }
    }

    #[test]
    fn test_draw_value_degenerate_range() {
        assert_eq!(draw_value(7, 7), 7);
        assert_eq!(draw_value(-3, -3), -3);
    }

    #[test]
    fn test_draw_value_negative_bounds() {
        for _ in 0..100 {
            let num = draw_value(-10, -1);
            assert!((-10..=-1).contains(&num));
        }
    }

    #[test]
    fn test_check_bounds() {
        assert!(check_bounds(1, 10).is_ok());
        assert!(check_bounds(5, 5).is_ok());
        assert!(check_bounds(10, 1).is_err());
    }
}

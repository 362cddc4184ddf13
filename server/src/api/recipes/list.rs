use crate::api::ErrorResponse;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::SharedState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::summary::{to_summaries, RecipeSummary};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecipesParams {
    /// Number of items to return (default: 20, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
    /// Restrict to one category
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "Published recipes, newest first", body = ListRecipesResponse),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<SharedState>,
    Query(params): Query<ListRecipesParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut conn = get_conn!(state.pool);

    let mut query = recipes::table.select(Recipe::as_select()).into_boxed();

    if let Some(category_id) = params.category_id {
        query = query.filter(recipes::category_id.eq(category_id));
    }

    let result: QueryResult<(Vec<Recipe>, i64)> = (|| {
        let rows = query
            .order(recipes::created_at.desc())
            .limit(limit)
            .offset(offset)
            .load(&mut conn)?;
        let total = match params.category_id {
            Some(category_id) => recipes::table
                .filter(recipes::category_id.eq(category_id))
                .count()
                .get_result(&mut conn)?,
            None => recipes::table.count().get_result(&mut conn)?,
        };
        Ok((rows, total))
    })();

    let (rows, total) = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to list recipes: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    let summaries = match to_summaries(&mut conn, rows) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to load ratings: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list recipes".to_string(),
                }),
            )
                .into_response();
        }
    };

    (
        StatusCode::OK,
        Json(ListRecipesResponse {
            recipes: summaries,
            total,
        }),
    )
        .into_response()
}

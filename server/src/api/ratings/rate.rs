use crate::api::recipes::summary::summarize;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::NewRating;
use crate::schema::{ratings, recipes};
use crate::SharedState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::upsert::excluded;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RateRecipeRequest {
    pub recipe_id: i32,
    /// 1 to 5 stars
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RateRecipeResponse {
    pub success: bool,
    pub average_rating: f64,
    pub total_ratings: i64,
}

#[utoipa::path(
    post,
    path = "/api/ratings",
    tag = "ratings",
    request_body(content = RateRecipeRequest, example = json!({"recipe_id": 1, "rating": 5})),
    responses(
        (status = 200, description = "Rating stored; recomputed average returned", body = RateRecipeResponse),
        (status = 400, description = "Rating out of range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn rate_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<RateRecipeRequest>,
) -> impl IntoResponse {
    if !(1..=5).contains(&req.rating) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Rating must be between 1 and 5".to_string(),
            }),
        )
            .into_response();
    }

    let mut conn = get_conn!(state.pool);

    let recipe_exists: bool = match diesel::select(exists(
        recipes::table.filter(recipes::id.eq(req.recipe_id)),
    ))
    .get_result(&mut conn)
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to check recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to rate recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    if !recipe_exists {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found".to_string(),
            }),
        )
            .into_response();
    }

    let new_rating = NewRating {
        user_id: user.id,
        recipe_id: req.recipe_id,
        rating: req.rating,
    };

    // Upsert on the UNIQUE (user_id, recipe_id) constraint: a re-rate
    // updates in place, and two concurrent requests cannot both insert.
    let result: QueryResult<Vec<i32>> = (|| {
        diesel::insert_into(ratings::table)
            .values(&new_rating)
            .on_conflict((ratings::user_id, ratings::recipe_id))
            .do_update()
            .set(ratings::rating.eq(excluded(ratings::rating)))
            .execute(&mut conn)?;

        ratings::table
            .filter(ratings::recipe_id.eq(req.recipe_id))
            .select(ratings::rating)
            .load(&mut conn)
    })();

    match result {
        Ok(values) => {
            let (average_rating, total_ratings) = summarize(&values);
            (
                StatusCode::OK,
                Json(RateRecipeResponse {
                    success: true,
                    average_rating,
                    total_ratings,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to rate recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to rate recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::recipes;
use crate::SharedState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

use super::summary::{to_summaries, RecipeSummary};

#[utoipa::path(
    get,
    path = "/api/recipes/mine",
    tag = "recipes",
    responses(
        (status = 200, description = "The caller's recipes, newest first", body = [RecipeSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_recipes(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let result: QueryResult<Vec<RecipeSummary>> = (|| {
        let rows = recipes::table
            .filter(recipes::user_id.eq(user.id))
            .order(recipes::created_at.desc())
            .select(Recipe::as_select())
            .load(&mut conn)?;
        to_summaries(&mut conn, rows)
    })();

    match result {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list own recipes: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list recipes".to_string(),
                }),
            )
                .into_response()
        }
    }
}

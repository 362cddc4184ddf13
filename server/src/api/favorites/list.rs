use crate::api::recipes::summary::{to_summaries, RecipeSummary};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{favorites, recipes};
use crate::SharedState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;

#[utoipa::path(
    get,
    path = "/api/favorites",
    tag = "favorites",
    responses(
        (status = 200, description = "Recipes the caller has favorited, newest favorite first", body = [RecipeSummary]),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_favorites(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let result: QueryResult<Vec<RecipeSummary>> = (|| {
        let rows = favorites::table
            .inner_join(recipes::table)
            .filter(favorites::user_id.eq(user.id))
            .order(favorites::created_at.desc())
            .select(Recipe::as_select())
            .load(&mut conn)?;
        to_summaries(&mut conn, rows)
    })();

    match result {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list favorites: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list favorites".to_string(),
                }),
            )
                .into_response()
        }
    }
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::NewFavorite;
use crate::schema::{favorites, recipes};
use crate::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;

#[utoipa::path(
    put,
    path = "/api/recipes/{id}/favorite",
    tag = "favorites",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe is in the caller's favorites (idempotent)"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(recipe_id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let recipe_exists: bool = match diesel::select(exists(
        recipes::table.filter(recipes::id.eq(recipe_id)),
    ))
    .get_result(&mut conn)
    {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Failed to check recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add favorite".to_string(),
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

    let new_favorite = NewFavorite {
        user_id: user.id,
        recipe_id,
    };

    // The UNIQUE (user_id, recipe_id) constraint makes a second add a no-op
    match diesel::insert_into(favorites::table)
        .values(&new_favorite)
        .on_conflict((favorites::user_id, favorites::recipe_id))
        .do_nothing()
        .execute(&mut conn)
    {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!("Failed to add favorite: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add favorite".to_string(),
                }),
            )
                .into_response()
        }
    }
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::schema::{comments, favorites, ratings, recipe_ingredients, recipes};
use crate::uploads;
use crate::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "Recipe and its dependents deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found or not owned by the caller", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    // No DB-level cascades: dependents go first, in a fixed order, then the
    // recipe row, all inside one transaction.
    let result: Result<Option<String>, diesel::result::Error> = conn.transaction(|conn| {
        let image_path: Option<Option<String>> = recipes::table
            .find(id)
            .filter(recipes::user_id.eq(user.id))
            .select(recipes::image_path)
            .first(conn)
            .optional()?;

        let image_path = match image_path {
            Some(p) => p,
            None => return Err(diesel::NotFound),
        };

        diesel::delete(recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(id)))
            .execute(conn)?;
        diesel::delete(comments::table.filter(comments::recipe_id.eq(id))).execute(conn)?;
        diesel::delete(ratings::table.filter(ratings::recipe_id.eq(id))).execute(conn)?;
        diesel::delete(favorites::table.filter(favorites::recipe_id.eq(id))).execute(conn)?;
        diesel::delete(recipes::table.find(id)).execute(conn)?;

        Ok(image_path)
    });

    match result {
        Ok(image_path) => {
            // Rows are gone; file removal is best-effort
            if let Some(filename) = image_path {
                uploads::remove_image(&state.config.upload_dir, &filename);
            }
            StatusCode::NO_CONTENT.into_response()
        }
        Err(diesel::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Recipe not found or you do not own it".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to delete recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to delete recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

use crate::api::ErrorResponse;
use crate::get_conn;
use crate::models::Recipe;
use crate::schema::{comments, ingredients, ratings, recipe_ingredients, recipes, users};
use crate::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

use super::summary::summarize;

/// One ingredient line of a recipe: the shared ingredient joined with the
/// per-recipe quantity and notes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientLine {
    pub ingredient_id: i32,
    pub name: String,
    pub unit: Option<String>,
    pub quantity: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CommentView {
    pub id: i32,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub image_path: Option<String>,
    pub ingredients: Vec<IngredientLine>,
    pub comments: Vec<CommentView>,
    pub average_rating: f64,
    pub total_ratings: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe details with ingredients and comments", body = RecipeDetailResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let recipe: Recipe = match recipes::table
        .find(id)
        .select(Recipe::as_select())
        .first(&mut conn)
    {
        Ok(r) => r,
        Err(diesel::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Recipe not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch recipe: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let result: QueryResult<(Vec<IngredientLine>, Vec<CommentView>, Vec<i32>)> = (|| {
        let ingredient_rows: Vec<(i32, String, Option<String>, f64, Option<String>)> =
            recipe_ingredients::table
                .inner_join(ingredients::table)
                .filter(recipe_ingredients::recipe_id.eq(id))
                .order(recipe_ingredients::id.asc())
                .select((
                    ingredients::id,
                    ingredients::name,
                    ingredients::unit,
                    recipe_ingredients::quantity,
                    recipe_ingredients::notes,
                ))
                .load(&mut conn)?;

        let comment_rows: Vec<(i32, String, String, DateTime<Utc>)> = comments::table
            .inner_join(users::table)
            .filter(comments::recipe_id.eq(id))
            .filter(comments::is_approved.eq(true))
            .order(comments::created_at.asc())
            .select((
                comments::id,
                users::username,
                comments::content,
                comments::created_at,
            ))
            .load(&mut conn)?;

        let rating_values: Vec<i32> = ratings::table
            .filter(ratings::recipe_id.eq(id))
            .select(ratings::rating)
            .load(&mut conn)?;

        let ingredient_lines = ingredient_rows
            .into_iter()
            .map(
                |(ingredient_id, name, unit, quantity, notes)| IngredientLine {
                    ingredient_id,
                    name,
                    unit,
                    quantity,
                    notes,
                },
            )
            .collect();

        let comment_views = comment_rows
            .into_iter()
            .map(|(id, author, content, created_at)| CommentView {
                id,
                author,
                content,
                created_at,
            })
            .collect();

        Ok((ingredient_lines, comment_views, rating_values))
    })();

    let (ingredient_lines, comment_views, rating_values) = match result {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to fetch recipe details: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to fetch recipe".to_string(),
                }),
            )
                .into_response();
        }
    };

    let (average_rating, total_ratings) = summarize(&rating_values);

    let response = RecipeDetailResponse {
        id: recipe.id,
        user_id: recipe.user_id,
        category_id: recipe.category_id,
        title: recipe.title,
        description: recipe.description,
        instructions: recipe.instructions,
        prep_time: recipe.prep_time,
        cook_time: recipe.cook_time,
        servings: recipe.servings,
        image_path: recipe.image_path,
        ingredients: ingredient_lines,
        comments: comment_views,
        average_rating,
        total_ratings,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
    };

    (StatusCode::OK, Json(response)).into_response()
}

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::{NewIngredient, NewRecipe, NewRecipeIngredient};
use crate::schema::{ingredients, recipe_ingredients, recipes};
use crate::uploads;
use crate::SharedState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateRecipeResponse {
    pub id: i32,
}

/// Schema for the multipart form; the ingredient_* fields repeat once per
/// ingredient line.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreateRecipeForm {
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub category_id: Option<i32>,
    pub ingredient_name: Option<String>,
    pub ingredient_quantity: Option<String>,
    pub ingredient_unit: Option<String>,
    pub ingredient_notes: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Option<Vec<u8>>,
}

/// Accumulated multipart form fields. Ingredient fields repeat and are
/// zipped by position, matching the original form's parallel arrays.
#[derive(Debug, Default)]
struct RecipeForm {
    title: String,
    description: Option<String>,
    instructions: String,
    prep_time: Option<i32>,
    cook_time: Option<i32>,
    servings: Option<i32>,
    category_id: Option<i32>,
    ingredient_names: Vec<String>,
    ingredient_quantities: Vec<String>,
    ingredient_units: Vec<String>,
    ingredient_notes: Vec<String>,
    image: Option<(String, Vec<u8>)>,
}

#[derive(Debug, PartialEq)]
struct IngredientInput {
    name: String,
    quantity: f64,
    unit: Option<String>,
    notes: Option<String>,
}

impl RecipeForm {
    /// Zips the parallel ingredient arrays into lines. Blank names are
    /// skipped; an unparsable quantity falls back to 0.
    fn ingredient_lines(&self) -> Vec<IngredientInput> {
        self.ingredient_names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                let quantity = self
                    .ingredient_quantities
                    .get(i)
                    .and_then(|q| q.trim().parse().ok())
                    .unwrap_or(0.0);
                let unit = self
                    .ingredient_units
                    .get(i)
                    .map(|u| u.trim())
                    .filter(|u| !u.is_empty())
                    .map(str::to_string);
                let notes = self
                    .ingredient_notes
                    .get(i)
                    .map(|n| n.trim())
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                Some(IngredientInput {
                    name: name.to_string(),
                    quantity,
                    unit,
                    notes,
                })
            })
            .collect()
    }
}

/// Reuses an ingredient matched by exact name, creating it on first use.
/// Ingredients are shared across recipes system-wide.
fn find_or_create_ingredient(
    conn: &mut PgConnection,
    name: &str,
    unit: Option<&str>,
) -> QueryResult<i32> {
    match ingredients::table
        .filter(ingredients::name.eq(name))
        .select(ingredients::id)
        .first(conn)
    {
        Ok(id) => Ok(id),
        Err(diesel::NotFound) => diesel::insert_into(ingredients::table)
            .values(&NewIngredient { name, unit })
            .returning(ingredients::id)
            .get_result(conn),
        Err(e) => Err(e),
    }
}

async fn read_form(multipart: &mut Multipart) -> Result<RecipeForm, (StatusCode, String)> {
    let mut form = RecipeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (e.status(), e.body_text()))?
    {
        let name = match field.name() {
            Some(n) => n.to_string(),
            None => continue,
        };

        if name == "image" {
            let file_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| (e.status(), e.body_text()))?;
            if !file_name.is_empty() && !data.is_empty() {
                form.image = Some((file_name, data.to_vec()));
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| (e.status(), e.body_text()))?;

        match name.as_str() {
            "title" => form.title = value,
            "description" => form.description = Some(value).filter(|v| !v.is_empty()),
            "instructions" => form.instructions = value,
            "prep_time" => form.prep_time = value.trim().parse().ok(),
            "cook_time" => form.cook_time = value.trim().parse().ok(),
            "servings" => form.servings = value.trim().parse().ok(),
            "category_id" => form.category_id = value.trim().parse().ok(),
            "ingredient_name" => form.ingredient_names.push(value),
            "ingredient_quantity" => form.ingredient_quantities.push(value),
            "ingredient_unit" => form.ingredient_units.push(value),
            "ingredient_notes" => form.ingredient_notes.push(value),
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content_type = "multipart/form-data", content = CreateRecipeForm),
    responses(
        (status = 201, description = "Recipe created successfully", body = CreateRecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let form = match read_form(&mut multipart).await {
        Ok(f) => f,
        Err((status, error)) => return (status, Json(ErrorResponse { error })).into_response(),
    };

    if form.title.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Title cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    if form.instructions.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Instructions cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

    // The image is written before the rows commit; a crash in between
    // leaves an orphaned file, never a recipe pointing at nothing.
    let image_path = match &form.image {
        Some((file_name, data)) => {
            match uploads::store_image(
                &state.config.upload_dir,
                file_name,
                data,
                state.config.max_upload_bytes,
            ) {
                Ok(stored) => Some(stored),
                Err(uploads::UploadError::Io(e)) => {
                    tracing::error!("Failed to store upload: {}", e);
                    return (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to store image".to_string(),
                        }),
                    )
                        .into_response();
                }
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponse {
                            error: e.to_string(),
                        }),
                    )
                        .into_response()
                }
            }
        }
        None => None,
    };

    let mut conn = get_conn!(state.pool);

    let result: Result<i32, diesel::result::Error> = conn.transaction(|conn| {
        let new_recipe = NewRecipe {
            user_id: user.id,
            category_id: form.category_id,
            title: form.title.trim(),
            description: form.description.as_deref(),
            instructions: &form.instructions,
            prep_time: form.prep_time,
            cook_time: form.cook_time,
            servings: form.servings,
            image_path: image_path.as_deref(),
        };

        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(&new_recipe)
            .returning(recipes::id)
            .get_result(conn)?;

        for line in form.ingredient_lines() {
            let ingredient_id = find_or_create_ingredient(conn, &line.name, line.unit.as_deref())?;

            diesel::insert_into(recipe_ingredients::table)
                .values(&NewRecipeIngredient {
                    recipe_id,
                    ingredient_id,
                    quantity: line.quantity,
                    notes: line.notes.as_deref(),
                })
                .execute(conn)?;
        }

        Ok(recipe_id)
    });

    match result {
        Ok(recipe_id) => (
            StatusCode::CREATED,
            Json(CreateRecipeResponse { id: recipe_id }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to create recipe: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recipe".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with_ingredients(
        names: &[&str],
        quantities: &[&str],
        units: &[&str],
    ) -> RecipeForm {
        RecipeForm {
            ingredient_names: names.iter().map(|s| s.to_string()).collect(),
            ingredient_quantities: quantities.iter().map(|s| s.to_string()).collect(),
            ingredient_units: units.iter().map(|s| s.to_string()).collect(),
            ..RecipeForm::default()
        }
    }

    #[test]
    fn test_ingredient_lines_zip_by_position() {
        let form = form_with_ingredients(&["Flour", "Sugar"], &["200", "100"], &["г", "г"]);
        let lines = form.ingredient_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "Flour");
        assert_eq!(lines[0].quantity, 200.0);
        assert_eq!(lines[1].unit.as_deref(), Some("г"));
    }

    #[test]
    fn test_blank_names_are_skipped() {
        let form = form_with_ingredients(&["  ", "Мука"], &["1", "2"], &["", ""]);
        let lines = form.ingredient_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Мука");
        assert_eq!(lines[0].quantity, 2.0);
        assert_eq!(lines[0].unit, None);
    }

    #[test]
    fn test_unparsable_quantity_defaults_to_zero() {
        let form = form_with_ingredients(&["Salt"], &["a pinch"], &[]);
        let lines = form.ingredient_lines();
        assert_eq!(lines[0].quantity, 0.0);
    }

    #[test]
    fn test_missing_quantity_defaults_to_zero() {
        let form = form_with_ingredients(&["Salt", "Pepper"], &["5"], &[]);
        let lines = form.ingredient_lines();
        assert_eq!(lines[1].quantity, 0.0);
    }
}

use crate::api::ErrorResponse;
use crate::get_conn;
use crate::models::Category;
use crate::schema::categories;
use crate::SharedState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use diesel::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "categories",
    responses(
        (status = 200, description = "All recipe categories", body = [CategoryResponse]),
        (status = 500, description = "Database error", body = ErrorResponse)
    )
)]
pub async fn list_categories(State(state): State<SharedState>) -> impl IntoResponse {
    let mut conn = get_conn!(state.pool);

    let rows: Vec<Category> = match categories::table
        .order(categories::name.asc())
        .select(Category::as_select())
        .load(&mut conn)
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("Failed to list categories: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to list categories".to_string(),
                }),
            )
                .into_response();
        }
    };

    let response: Vec<CategoryResponse> = rows
        .into_iter()
        .map(|c| CategoryResponse {
            id: c.id,
            name: c.name,
            description: c.description,
        })
        .collect();

    (StatusCode::OK, Json(response)).into_response()
}

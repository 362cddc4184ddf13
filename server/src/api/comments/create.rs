use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::get_conn;
use crate::models::NewComment;
use crate::schema::{comments, recipes};
use crate::SharedState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateCommentResponse {
    pub id: i32,
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/comments",
    tag = "comments",
    params(
        ("id" = i32, Path, description = "Recipe ID")
    ),
    request_body = CreateCommentRequest,
    responses(
        (status = 201, description = "Comment added", body = CreateCommentResponse),
        (status = 400, description = "Empty comment", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<SharedState>,
    Path(recipe_id): Path<i32>,
    Json(req): Json<CreateCommentRequest>,
) -> impl IntoResponse {
    if req.content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Comment cannot be empty".to_string(),
            }),
        )
            .into_response();
    }

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
                    error: "Failed to add comment".to_string(),
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

    let new_comment = NewComment {
        user_id: user.id,
        recipe_id,
        content: req.content.trim(),
    };

    match diesel::insert_into(comments::table)
        .values(&new_comment)
        .returning(comments::id)
        .get_result::<i32>(&mut conn)
    {
        Ok(id) => (StatusCode::CREATED, Json(CreateCommentResponse { id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to add comment: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to add comment".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub mod create;

use crate::SharedState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for comment endpoints
pub fn router() -> Router<SharedState> {
    Router::new().route(
        "/api/recipes/{id}/comments",
        post(create::create_comment),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(create::create_comment),
    components(schemas(create::CreateCommentRequest, create::CreateCommentResponse))
)]
pub struct ApiDoc;

pub mod list;

use crate::SharedState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/categories endpoints
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/categories", get(list::list_categories))
}

#[derive(OpenApi)]
#[openapi(
    paths(list::list_categories),
    components(schemas(list::CategoryResponse))
)]
pub struct ApiDoc;

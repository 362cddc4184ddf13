pub mod add;
pub mod list;
pub mod remove;

use crate::SharedState;
use axum::routing::{get, put};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for favorite endpoints
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/favorites", get(list::list_favorites))
        .route(
            "/api/recipes/{id}/favorite",
            put(add::add_favorite).delete(remove::remove_favorite),
        )
}

#[derive(OpenApi)]
#[openapi(paths(
    list::list_favorites,
    add::add_favorite,
    remove::remove_favorite
))]
pub struct ApiDoc;

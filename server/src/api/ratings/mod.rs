pub mod rate;

use crate::SharedState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for rating endpoints
pub fn router() -> Router<SharedState> {
    Router::new().route("/api/ratings", post(rate::rate_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(rate::rate_recipe),
    components(schemas(rate::RateRecipeRequest, rate::RateRecipeResponse))
)]
pub struct ApiDoc;

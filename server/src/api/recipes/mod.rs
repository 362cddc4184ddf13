pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod mine;
pub mod summary;

use crate::SharedState;
use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints
pub fn router() -> Router<SharedState> {
    Router::new()
        .route(
            "/api/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route("/api/recipes/mine", get(mine::my_recipes))
        .route(
            "/api/recipes/{id}",
            get(get::get_recipe).delete(delete::delete_recipe),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create::create_recipe,
        list::list_recipes,
        mine::my_recipes,
        get::get_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        create::CreateRecipeForm,
        create::CreateRecipeResponse,
        summary::RecipeSummary,
        list::ListRecipesResponse,
        get::RecipeDetailResponse,
        get::IngredientLine,
        get::CommentView,
    ))
)]
pub struct ApiDoc;

pub mod login;
pub mod logout;
pub mod register;

use crate::SharedState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/auth endpoints
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/auth/register", post(register::register))
        .route("/api/auth/login", post(login::login))
        .route("/api/auth/logout", post(logout::logout))
}

#[derive(OpenApi)]
#[openapi(
    paths(register::register, login::login, logout::logout),
    components(schemas(
        register::RegisterRequest,
        register::RegisterResponse,
        login::LoginRequest,
        login::LoginResponse,
    ))
)]
pub struct ApiDoc;

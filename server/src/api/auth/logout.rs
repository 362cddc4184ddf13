use crate::api::ErrorResponse;
use crate::auth::{bearer_token, delete_session, AuthUser};
use crate::get_conn;
use crate::SharedState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    AuthUser(_user): AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    // AuthUser already validated the header, so this cannot fail here
    let token = match bearer_token(&headers) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    let mut conn = get_conn!(state.pool);

    if let Err(e) = delete_session(&mut conn, token) {
        tracing::error!("Failed to delete session: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to log out".to_string(),
            }),
        )
            .into_response();
    }

    StatusCode::NO_CONTENT.into_response()
}

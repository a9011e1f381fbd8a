use axum::Router;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::Json;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat/users", get(list_users))
}

/// Everyone except the caller, for picking conversation and invite targets.
async fn list_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users_except(&user.id).await?;
    Ok(Json(users))
}

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Conflict(String),
    Auth(String),
    Unauthenticated,
    Forbidden(String),
    Config(String),
    OAuth(String),
    OAuthExchange(String),
    StateMismatch,
    Database(sqlx::Error),
    Session(tower_sessions::session::Error),
    Hash(bcrypt::BcryptError),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Not logged in".to_string()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            ApiError::OAuth(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::OAuthExchange(msg) => {
                tracing::error!("OAuth exchange failed: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, format!("LinkedIn authentication failed: {msg}"))
            }
            ApiError::StateMismatch => (StatusCode::BAD_REQUEST, "Invalid OAuth state".to_string()),
            ApiError::Database(e) => {
                tracing::error!("Database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Session(e) => {
                tracing::error!("Session error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            ApiError::Hash(e) => {
                tracing::error!("Password hashing error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // Unique-constraint violations are the race-safety backstop for the
        // application-level duplicate checks; surface them as conflicts.
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::Conflict("Resource already exists".to_string());
            }
        }
        ApiError::Database(e)
    }
}

impl From<tower_sessions::session::Error> for ApiError {
    fn from(e: tower_sessions::session::Error) -> Self {
        ApiError::Session(e)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        ApiError::Hash(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let (status, msg) = ApiError::Validation("name required".into()).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "name required");
    }

    #[test]
    fn conflict_maps_to_409() {
        let (status, _) = ApiError::Conflict("taken".into()).status_and_message();
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[test]
    fn unauthenticated_maps_to_401() {
        let (status, _) = ApiError::Unauthenticated.status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn database_error_hides_details() {
        let (status, msg) = ApiError::Database(sqlx::Error::RowNotFound).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal server error");
    }
}

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::ApiError;
use crate::models::{LoginMethod, User};

const USER_KEY: &str = "user";
const OAUTH_STATE_KEY: &str = "oauth_state";

/// Denormalized snapshot of the authenticated user held in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub points: i64,
    pub rank: i64,
    pub login_method: LoginMethod,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            first_name: user.first_name.clone(),
            surname: user.surname.clone(),
            email: user.email.clone(),
            points: user.points,
            rank: user.rank,
            login_method: user.login_method,
        }
    }
}

/// Extractor for handlers that require an authenticated caller. Rejects with
/// a 401 JSON body when the session has no user.
pub struct AuthUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;

        let user: Option<SessionUser> = session.get(USER_KEY).await.ok().flatten();

        user.map(AuthUser).ok_or(ApiError::Unauthenticated)
    }
}

pub async fn login_user(session: &Session, user: &User) -> Result<(), tower_sessions::session::Error> {
    session.insert(USER_KEY, SessionUser::from(user)).await
}

pub async fn logout_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

pub async fn set_oauth_state(
    session: &Session,
    state: &str,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(OAUTH_STATE_KEY, state.to_string()).await
}

/// Remove and return the pending OAuth state. Single-use: a second callback
/// with the same state finds nothing to match against.
pub async fn take_oauth_state(
    session: &Session,
) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(OAUTH_STATE_KEY).await
}

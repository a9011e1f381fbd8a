use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::{login_user, set_oauth_state, take_oauth_state};
use crate::error::ApiError;
use crate::linkedin::generate_state;
use crate::models::{LoginMethod, NewUser, User};

#[derive(Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/linkedin", get(start))
        .route("/auth/linkedin/callback", get(callback))
}

async fn start(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, ApiError> {
    let token = generate_state();
    let url = state.linkedin.authorize_url(&token)?;
    set_oauth_state(&session, &token).await?;
    Ok(Redirect::to(&url))
}

async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or(error);
        return Err(ApiError::OAuth(format!("LinkedIn authorization failed: {detail}")));
    }

    let code = params
        .code
        .ok_or_else(|| ApiError::OAuth("Missing authorization code".to_string()))?;

    // The stored state is consumed before anything else happens, so it can
    // never match twice and no failure path leaves it dangling.
    let expected = take_oauth_state(&session).await?;
    match (expected, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(ApiError::StateMismatch),
    }

    let access_token = state.linkedin.exchange_code(&code).await?;
    let profile = state.linkedin.fetch_profile(&access_token).await?;

    let user = match state.store.find_user_by_linkedin_id(&profile.id).await? {
        Some(existing) => {
            state
                .store
                .update_linkedin_profile(&existing.id, profile.picture_url.as_deref())
                .await?;
            existing
        }
        None => {
            let user = User::new(NewUser {
                email: profile.email,
                first_name: profile.first_name,
                middle_name: None,
                surname: profile.last_name,
                birthday: None,
                gender: None,
                password_hash: None,
                login_method: LoginMethod::LinkedIn,
                linkedin_id: Some(profile.id),
                profile_picture_url: profile.picture_url,
            });
            state.store.create_user(&user).await?;
            user
        }
    };

    login_user(&session, &user).await?;

    Ok(Redirect::to("/dashboard"))
}

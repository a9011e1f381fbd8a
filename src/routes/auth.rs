use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Router, extract::State};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;

use crate::AppState;
use crate::auth::{AuthUser, login_user, logout_user};
use crate::error::ApiError;
use crate::extract::Json;
use crate::models::{LoginMethod, NewUser, User};

#[derive(Deserialize)]
pub struct SignupPayload {
    #[serde(rename = "firstName")]
    first_name: Option<String>,
    #[serde(rename = "middleName")]
    middle_name: Option<String>,
    surname: Option<String>,
    email: Option<String>,
    password: Option<String>,
    birthday: Option<String>,
    gender: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginPayload {
    email: Option<String>,
    password: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(signup))
        .route("/api/login", post(login))
        .route("/api/user", get(current_user))
        .route("/auth/logout", get(logout))
}

fn required(field: Option<String>, name: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::Validation(format!("{name} is required"))),
    }
}

async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SignupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let first_name = required(payload.first_name, "firstName")?;
    let surname = required(payload.surname, "surname")?;
    let email = required(payload.email, "email")?;
    let password = required(payload.password, "password")?;
    let birthday = required(payload.birthday, "birthday")?;
    let gender = required(payload.gender, "gender")?;

    // Fast path; the UNIQUE constraint on users.email catches the race
    // between concurrent signups with the same address.
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;

    let user = User::new(NewUser {
        email,
        first_name,
        middle_name: payload.middle_name.filter(|m| !m.trim().is_empty()),
        surname,
        birthday: Some(birthday),
        gender: Some(gender),
        password_hash: Some(password_hash),
        login_method: LoginMethod::Email,
        linkedin_id: None,
        profile_picture_url: None,
    });

    state.store.create_user(&user).await?;
    login_user(&session, &user).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let email = required(payload.email, "email")?;
    let password = required(payload.password, "password")?;

    let user = state.store.find_user_by_email(&email).await?;

    // One uniform failure for unknown email, wrong password, and accounts
    // without a password (LinkedIn-only users).
    let user = match user {
        Some(user) => {
            let valid = match &user.password_hash {
                Some(hash) => bcrypt::verify(&password, hash)?,
                None => false,
            };
            if !valid {
                return Err(ApiError::Auth("Invalid email or password".to_string()));
            }
            user
        }
        None => return Err(ApiError::Auth("Invalid email or password".to_string())),
    };

    login_user(&session, &user).await?;

    Ok(Json(json!({ "success": true, "user": user })))
}

async fn current_user(AuthUser(user): AuthUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(user))
}

async fn logout(session: Session) -> Result<impl IntoResponse, ApiError> {
    logout_user(&session).await?;
    Ok(Redirect::to("/"))
}

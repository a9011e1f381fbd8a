use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_POINTS: i64 = 2690;
pub const DEFAULT_RANK: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum LoginMethod {
    #[serde(rename = "email")]
    #[sqlx(rename = "email")]
    Email,
    #[serde(rename = "linkedin")]
    #[sqlx(rename = "linkedin")]
    LinkedIn,
}

impl std::fmt::Display for LoginMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginMethod::Email => write!(f, "email"),
            LoginMethod::LinkedIn => write!(f, "linkedin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub points: i64,
    pub rank: i64,
    pub login_method: LoginMethod,
    pub linkedin_id: Option<String>,
    pub profile_picture_url: Option<String>,
    pub is_online: bool,
    pub last_seen: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub password_hash: Option<String>,
    pub login_method: LoginMethod,
    pub linkedin_id: Option<String>,
    pub profile_picture_url: Option<String>,
}

impl User {
    pub fn new(fields: NewUser) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            email: fields.email,
            first_name: fields.first_name,
            middle_name: fields.middle_name,
            surname: fields.surname,
            birthday: fields.birthday,
            gender: fields.gender,
            password_hash: fields.password_hash,
            points: DEFAULT_POINTS,
            rank: DEFAULT_RANK,
            login_method: fields.login_method,
            linkedin_id: fields.linkedin_id,
            profile_picture_url: fields.profile_picture_url,
            is_online: false,
            last_seen: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// User projection safe to show to other users (no credentials).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicUser {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub is_online: bool,
    pub last_seen: String,
    pub login_method: LoginMethod,
    pub linkedin_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_method_serde_roundtrip() {
        let variants = vec![
            (LoginMethod::Email, "\"email\""),
            (LoginMethod::LinkedIn, "\"linkedin\""),
        ];
        for (variant, expected_json) in variants {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, expected_json);
            let deserialized: LoginMethod = serde_json::from_str(&json).unwrap();
            assert_eq!(deserialized, variant);
        }
    }

    #[test]
    fn new_user_gets_default_points_and_rank() {
        let user = User::new(NewUser {
            email: "a@b.c".into(),
            first_name: "A".into(),
            middle_name: None,
            surname: "B".into(),
            birthday: None,
            gender: None,
            password_hash: None,
            login_method: LoginMethod::Email,
            linkedin_id: None,
            profile_picture_url: None,
        });
        assert_eq!(user.points, DEFAULT_POINTS);
        assert_eq!(user.rank, DEFAULT_RANK);
        assert!(!user.is_online);
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = User::new(NewUser {
            email: "a@b.c".into(),
            first_name: "A".into(),
            middle_name: None,
            surname: "B".into(),
            birthday: None,
            gender: None,
            password_hash: Some("secret-hash".into()),
            login_method: LoginMethod::Email,
            linkedin_id: None,
            profile_picture_url: None,
        });
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}

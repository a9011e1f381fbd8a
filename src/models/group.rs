use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum GroupRole {
    #[serde(rename = "admin")]
    #[sqlx(rename = "admin")]
    Admin,
    #[serde(rename = "member")]
    #[sqlx(rename = "member")]
    Member,
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupRole::Admin => write!(f, "admin"),
            GroupRole::Member => write!(f, "member"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: String,
    pub is_private: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Group {
    pub fn new(name: String, description: Option<String>, is_private: bool, created_by: String) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_by,
            is_private,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    pub role: GroupRole,
    pub joined_at: String,
}

impl GroupMember {
    pub fn new(group_id: String, user_id: String, role: GroupRole) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            user_id,
            role,
            joined_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Membership row joined with the member's display fields, for member listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupMemberView {
    pub user_id: String,
    pub role: GroupRole,
    pub joined_at: String,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub profile_picture_url: Option<String>,
    pub is_online: bool,
    pub last_seen: String,
}

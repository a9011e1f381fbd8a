use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum InvitationStatus {
    #[serde(rename = "pending")]
    #[sqlx(rename = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    #[sqlx(rename = "accepted")]
    Accepted,
    #[serde(rename = "declined")]
    #[sqlx(rename = "declined")]
    Declined,
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationStatus::Pending => write!(f, "pending"),
            InvitationStatus::Accepted => write!(f, "accepted"),
            InvitationStatus::Declined => write!(f, "declined"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupInvitation {
    pub id: String,
    pub group_id: String,
    pub invited_by: String,
    pub invited_user_id: String,
    pub status: InvitationStatus,
    pub created_at: String,
    pub responded_at: Option<String>,
}

impl GroupInvitation {
    pub fn new(group_id: String, invited_by: String, invited_user_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            group_id,
            invited_by,
            invited_user_id,
            status: InvitationStatus::Pending,
            created_at: Utc::now().to_rfc3339(),
            responded_at: None,
        }
    }
}

/// Pending invitation joined with group and inviter display fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvitationView {
    pub id: String,
    pub group_id: String,
    pub invited_by: String,
    pub status: InvitationStatus,
    pub created_at: String,
    pub group_name: String,
    pub group_description: Option<String>,
    pub inviter_first_name: String,
    pub inviter_surname: String,
}

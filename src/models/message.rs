use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum MessageType {
    #[serde(rename = "text")]
    #[sqlx(rename = "text")]
    Text,
    #[serde(rename = "image")]
    #[sqlx(rename = "image")]
    Image,
    #[serde(rename = "file")]
    #[sqlx(rename = "file")]
    File,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Text => write!(f, "text"),
            MessageType::Image => write!(f, "image"),
            MessageType::File => write!(f, "file"),
        }
    }
}

/// The target of a message. Exactly one of group or recipient, enforced at
/// construction and again by a CHECK constraint on the messages table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageTarget {
    Group(String),
    Recipient(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub group_id: Option<String>,
    pub recipient_id: Option<String>,
    pub content: String,
    pub message_type: MessageType,
    pub is_read: bool,
    pub created_at: String,
}

impl Message {
    pub fn new(sender_id: String, target: MessageTarget, content: String, message_type: MessageType) -> Self {
        let (group_id, recipient_id) = match target {
            MessageTarget::Group(id) => (Some(id), None),
            MessageTarget::Recipient(id) => (None, Some(id)),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id,
            group_id,
            recipient_id,
            content,
            message_type,
            is_read: false,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Message joined with sender display fields, for conversation listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MessageView {
    pub id: String,
    pub content: String,
    pub message_type: MessageType,
    pub is_read: bool,
    pub created_at: String,
    pub sender_id: String,
    pub sender_first_name: String,
    pub sender_surname: String,
    pub sender_profile_picture_url: Option<String>,
}

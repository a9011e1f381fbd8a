use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::{
    Group, GroupInvitation, GroupMember, GroupMemberView, GroupRole, InvitationStatus,
    InvitationView, Message, MessageTarget, MessageView, PublicUser, User,
};

/// Row-level gateway over the relational store. Constructed once at startup
/// and injected through `AppState`; every method returns `Result` so callers
/// decide how a storage failure surfaces.
///
/// Uniqueness (user email, linkedin id, the (group, user) membership pair) is
/// enforced by UNIQUE constraints in the schema. Application-level existence
/// checks are a fast path for friendlier errors, not the race-safety
/// mechanism.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // --- users ---

    pub async fn create_user(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, email, first_name, middle_name, surname, birthday, gender,
                password_hash, points, rank, login_method, linkedin_id,
                profile_picture_url, is_online, last_seen, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.middle_name)
        .bind(&user.surname)
        .bind(&user.birthday)
        .bind(&user.gender)
        .bind(&user.password_hash)
        .bind(user.points)
        .bind(user.rank)
        .bind(user.login_method)
        .bind(&user.linkedin_id)
        .bind(&user.profile_picture_url)
        .bind(user.is_online)
        .bind(&user.last_seen)
        .bind(&user.created_at)
        .bind(&user.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(email = %user.email, "user created");
        Ok(())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_user_by_linkedin_id(
        &self,
        linkedin_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE linkedin_id = ?")
            .bind(linkedin_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Refresh the stored profile picture after a LinkedIn login.
    pub async fn update_linkedin_profile(
        &self,
        user_id: &str,
        profile_picture_url: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE users SET profile_picture_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(profile_picture_url)
        .bind(&now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn set_online_status(
        &self,
        user_id: &str,
        is_online: bool,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE users SET is_online = ?, last_seen = ?, updated_at = ? WHERE id = ?",
        )
        .bind(is_online)
        .bind(&now)
        .bind(&now)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All users except the caller, public projection only.
    pub async fn list_users_except(
        &self,
        user_id: &str,
    ) -> Result<Vec<PublicUser>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, first_name, surname, email, profile_picture_url,
                   is_online, last_seen, login_method, linkedin_id
            FROM users
            WHERE id != ?
            ORDER BY first_name, surname
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    // --- groups ---

    /// Insert the group and its creator's admin membership in one
    /// transaction, so a crash cannot leave an ownerless group.
    pub async fn create_group(&self, group: &Group) -> Result<(), sqlx::Error> {
        let member = GroupMember::new(
            group.id.clone(),
            group.created_by.clone(),
            GroupRole::Admin,
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO groups (id, name, description, created_by, is_private, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(&group.description)
        .bind(&group.created_by)
        .bind(group.is_private)
        .bind(&group.created_at)
        .bind(&group.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO group_members (id, group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&member.id)
        .bind(&member.group_id)
        .bind(&member.user_id)
        .bind(member.role)
        .bind(&member.joined_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(group = %group.name, "group created");
        Ok(())
    }

    pub async fn find_group(&self, group_id: &str) -> Result<Option<Group>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_user_groups(&self, user_id: &str) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT g.* FROM groups g
            JOIN group_members gm ON gm.group_id = g.id
            WHERE gm.user_id = ?
            ORDER BY g.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn list_group_members(
        &self,
        group_id: &str,
    ) -> Result<Vec<GroupMemberView>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT gm.user_id, gm.role, gm.joined_at,
                   u.first_name, u.surname, u.email, u.profile_picture_url,
                   u.is_online, u.last_seen
            FROM group_members gm
            JOIN users u ON u.id = gm.user_id
            WHERE gm.group_id = ?
            ORDER BY gm.joined_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn is_group_member(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM group_members WHERE group_id = ? AND user_id = ?",
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0 > 0)
    }

    pub async fn add_group_member(&self, member: &GroupMember) -> Result<(), sqlx::Error> {
        // OR IGNORE: accepting two invitations to the same group must not fail
        sqlx::query(
            "INSERT OR IGNORE INTO group_members (id, group_id, user_id, role, joined_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&member.id)
        .bind(&member.group_id)
        .bind(&member.user_id)
        .bind(member.role)
        .bind(&member.joined_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // --- invitations ---

    pub async fn create_invitation(
        &self,
        invitation: &GroupInvitation,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO group_invitations (id, group_id, invited_by, invited_user_id, status, created_at, responded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invitation.id)
        .bind(&invitation.group_id)
        .bind(&invitation.invited_by)
        .bind(&invitation.invited_user_id)
        .bind(invitation.status)
        .bind(&invitation.created_at)
        .bind(&invitation.responded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_invitation(
        &self,
        invitation_id: &str,
    ) -> Result<Option<GroupInvitation>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM group_invitations WHERE id = ?")
            .bind(invitation_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list_pending_invitations(
        &self,
        user_id: &str,
    ) -> Result<Vec<InvitationView>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT gi.id, gi.group_id, gi.invited_by, gi.status, gi.created_at,
                   g.name AS group_name, g.description AS group_description,
                   u.first_name AS inviter_first_name, u.surname AS inviter_surname
            FROM group_invitations gi
            JOIN groups g ON g.id = gi.group_id
            JOIN users u ON u.id = gi.invited_by
            WHERE gi.invited_user_id = ? AND gi.status = 'pending'
            ORDER BY gi.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Record a response. The WHERE clause only matches pending rows, which
    /// keeps the pending -> accepted|declined transition one-way and
    /// terminal; returns false when the invitation was already resolved.
    pub async fn respond_to_invitation(
        &self,
        invitation_id: &str,
        status: InvitationStatus,
    ) -> Result<bool, sqlx::Error> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE group_invitations SET status = ?, responded_at = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(status)
        .bind(&now)
        .bind(invitation_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- messages ---

    pub async fn create_message(&self, message: &Message) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, group_id, recipient_id, content, message_type, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.sender_id)
        .bind(&message.group_id)
        .bind(&message.recipient_id)
        .bind(&message.content)
        .bind(message.message_type)
        .bind(message.is_read)
        .bind(&message.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Messages for one target, newest first, capped at `limit`, each joined
    /// with the sender's display fields.
    pub async fn list_messages(
        &self,
        target: &MessageTarget,
        limit: i64,
    ) -> Result<Vec<MessageView>, sqlx::Error> {
        let (filter, id) = match target {
            MessageTarget::Group(id) => ("m.group_id = ?", id),
            MessageTarget::Recipient(id) => ("m.recipient_id = ?", id),
        };

        let sql = format!(
            r#"
            SELECT m.id, m.content, m.message_type, m.is_read, m.created_at,
                   m.sender_id,
                   u.first_name AS sender_first_name,
                   u.surname AS sender_surname,
                   u.profile_picture_url AS sender_profile_picture_url
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE {filter}
            ORDER BY m.created_at DESC
            LIMIT ?
            "#
        );

        sqlx::query_as(&sql)
            .bind(id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }
}

use axum::Router;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde::Deserialize;

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::extract::Json;
use crate::models::{Group, GroupInvitation, GroupMember, GroupRole, InvitationStatus};

#[derive(Deserialize)]
pub struct CreateGroupPayload {
    name: Option<String>,
    description: Option<String>,
    is_private: Option<bool>,
}

#[derive(Deserialize)]
pub struct InvitePayload {
    user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct RespondPayload {
    status: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/chat/groups", get(list_groups))
        .route("/api/chat/groups", post(create_group))
        .route("/api/chat/groups/{id}/members", get(list_members))
        .route("/api/chat/groups/{id}/invite", post(invite))
        .route("/api/chat/invitations", get(list_invitations))
        .route("/api/chat/invitations/{id}/respond", post(respond))
}

async fn list_groups(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let groups = state.store.list_user_groups(&user.id).await?;
    Ok(Json(groups))
}

async fn create_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(payload): Json<CreateGroupPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let name = payload
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("Group name is required".to_string()))?;

    let group = Group::new(
        name,
        payload.description.filter(|d| !d.trim().is_empty()),
        payload.is_private.unwrap_or(false),
        user.id,
    );

    state.store.create_group(&group).await?;

    Ok(Json(group))
}

/// Listing members of a private group requires membership; public groups are
/// listable by any authenticated user.
async fn list_members(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let group = state
        .store
        .find_group(&group_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Group not found".to_string()))?;

    if group.is_private && !state.store.is_group_member(&group_id, &user.id).await? {
        return Err(ApiError::Forbidden(
            "Only members can view this group".to_string(),
        ));
    }

    let members = state.store.list_group_members(&group_id).await?;
    Ok(Json(members))
}

async fn invite(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(group_id): Path<String>,
    Json(payload): Json<InvitePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let invitee_id = payload
        .user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("user_id is required".to_string()))?;

    state
        .store
        .find_group(&group_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Group not found".to_string()))?;

    if !state.store.is_group_member(&group_id, &user.id).await? {
        return Err(ApiError::Forbidden(
            "Only members can invite to this group".to_string(),
        ));
    }

    let invitation = GroupInvitation::new(group_id, user.id, invitee_id);
    state.store.create_invitation(&invitation).await?;

    Ok(Json(invitation))
}

async fn list_invitations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let invitations = state.store.list_pending_invitations(&user.id).await?;
    Ok(Json(invitations))
}

async fn respond(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(invitation_id): Path<String>,
    Json(payload): Json<RespondPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match payload.status.as_deref() {
        Some("accepted") => InvitationStatus::Accepted,
        Some("declined") => InvitationStatus::Declined,
        _ => {
            return Err(ApiError::Validation(
                "status must be 'accepted' or 'declined'".to_string(),
            ));
        }
    };

    let invitation = state
        .store
        .find_invitation(&invitation_id)
        .await?
        .ok_or_else(|| ApiError::Validation("Invitation not found".to_string()))?;

    if invitation.invited_user_id != user.id {
        return Err(ApiError::Forbidden(
            "This invitation is not addressed to you".to_string(),
        ));
    }

    let updated = state
        .store
        .respond_to_invitation(&invitation_id, status)
        .await?;
    if !updated {
        return Err(ApiError::Validation(
            "Invitation has already been responded to".to_string(),
        ));
    }

    if status == InvitationStatus::Accepted {
        let member = GroupMember::new(invitation.group_id, user.id, GroupRole::Member);
        state.store.add_group_member(&member).await?;
    }

    Ok(Json(serde_json::json!({ "success": true, "status": status })))
}

//! Friend request transitions: Pending -> Approved | Rejected, both terminal.

use anyhow::anyhow;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::friends::{FriendRequest, FriendRequestStatus},
};

/// What the sender of a new request already shares with the recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingRelation {
    pub already_friends: bool,
    /// A pending request exists, in either direction.
    pub pending_request: bool,
}

pub fn ensure_can_send(
    sender_id: Uuid,
    recipient_id: Uuid,
    relation: ExistingRelation,
) -> AppResult<()> {
    if sender_id == recipient_id {
        return Err(AppError::BadRequest(anyhow!("Cannot send request to self.")));
    }
    if relation.already_friends {
        return Err(AppError::BadRequest(anyhow!("User is already in friends.")));
    }
    if relation.pending_request {
        return Err(AppError::BadRequest(anyhow!(
            "A pending request already exists."
        )));
    }
    Ok(())
}

/// Validates a resolution of `request` by `acting_user_id` and returns the
/// status the request moves to. `decision` is the raw `status` query value.
pub fn resolve(
    request: &FriendRequest,
    acting_user_id: Uuid,
    decision: &str,
) -> AppResult<FriendRequestStatus> {
    if request.status != FriendRequestStatus::Pending {
        return Err(AppError::BadRequest(anyhow!(
            "Request status is already resolved."
        )));
    }
    if request.to_id != acting_user_id {
        return Err(AppError::BadRequest(anyhow!(
            "Friend request belongs to different user."
        )));
    }

    match decision {
        "approved" => Ok(FriendRequestStatus::Approved),
        "rejected" => Ok(FriendRequestStatus::Rejected),
        _ => Err(AppError::BadRequest(anyhow!(
            "Invalid friend request status."
        ))),
    }
}

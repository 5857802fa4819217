use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

/// Request lifecycle. Declined requests stay in the table and do not block
/// a later re-send.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FriendRequestEntity {
    pub id: Uuid,
    pub requester_id: String,
    pub target_id: String,
    pub status: FriendRequestStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::schema::{FriendRequestEntity, FriendRequestStatus};

/// Follow edges. Friendship is not stored directly; it is the mutual-follow
/// intersection, so a one-way follow is representable but never surfaced.
#[async_trait::async_trait]
pub trait FollowRepository {
    /// Inserts both directed edges in one statement, skipping existing rows.
    async fn upsert_mutual_follow(&self, a: &str, b: &str) -> Result<(), error::SystemError>;

    /// Ids the user follows that follow them back.
    async fn find_friend_ids(&self, user_id: &str) -> Result<Vec<String>, error::SystemError>;
}

#[async_trait::async_trait]
pub trait FriendRequestRepository {
    /// All requests between the pair, in either direction, any status.
    async fn find_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError>;

    async fn insert(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<FriendRequestEntity, error::SystemError>;

    async fn set_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<(), error::SystemError>;

    /// Incoming pending requests, newest first.
    async fn list_pending_for(
        &self,
        target_id: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError>;
}

pub trait FriendRepo: FollowRepository + FriendRequestRepository + Send + Sync {}

impl<T> FriendRepo for T where T: FollowRepository + FriendRequestRepository + Send + Sync {}

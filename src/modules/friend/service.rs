use std::collections::HashMap;
use std::sync::Arc;

use log::{error, warn};
use uuid::Uuid;

use crate::api::error;
use crate::modules::friend::{
    model::{PendingRequestView, RespondAction},
    repository::FriendRepo,
    schema::{FriendRequestEntity, FriendRequestStatus},
};
use crate::modules::notification::{
    repository::NotificationRepository, schema::NotificationType, service::NotificationService,
};
use crate::modules::profile::{
    model::ProfileResponse,
    repository::ProfileRepository,
    service::ensure_profile,
};
use crate::modules::ranking::{
    repository::RankingRepository,
    schema::{RankingSummary, SourceType},
};

pub struct FriendService<R, P, K, N>
where
    R: FriendRepo,
    P: ProfileRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    repo: Arc<R>,
    profiles: Arc<P>,
    rankings: Arc<K>,
    notifications: Arc<NotificationService<N>>,
}

impl<R, P, K, N> FriendService<R, P, K, N>
where
    R: FriendRepo,
    P: ProfileRepository + Send + Sync,
    K: RankingRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(
        repo: Arc<R>,
        profiles: Arc<P>,
        rankings: Arc<K>,
        notifications: Arc<NotificationService<N>>,
    ) -> Self {
        FriendService { repo, profiles, rankings, notifications }
    }

    /// Resolve a friend code to its owner and open a pending request.
    /// The recipient's notification is fire-and-forget.
    pub async fn send_request(
        &self,
        caller_id: &str,
        friend_code: &str,
    ) -> Result<(FriendRequestEntity, String), error::SystemError> {
        let target = self
            .profiles
            .find_by_friend_code(friend_code.trim())
            .await?
            .ok_or_else(|| error::SystemError::not_found("Invalid friend code"))?;

        if target.id == caller_id {
            return Err(error::SystemError::bad_request(
                "Cannot add yourself as a friend",
            ));
        }

        if self.repo.find_friend_ids(caller_id).await?.contains(&target.id) {
            return Err(error::SystemError::conflict("Already friends"));
        }

        for existing in self.repo.find_between(caller_id, &target.id).await? {
            match existing.status {
                FriendRequestStatus::Pending => {
                    return Err(error::SystemError::conflict("Friend request already sent"));
                }
                FriendRequestStatus::Accepted => {
                    return Err(error::SystemError::conflict("Already friends"));
                }
                FriendRequestStatus::Declined => {}
            }
        }

        let requester = ensure_profile(&*self.profiles, caller_id).await?;
        let request = self.repo.insert(caller_id, &target.id).await?;

        let data = serde_json::json!({
            "friend_request_id": request.id,
            "requester_id": caller_id,
            "requester_name": requester.visible_name(),
        });
        if let Err(e) = self
            .notifications
            .create(&target.id, NotificationType::FriendRequest, data)
            .await
        {
            warn!("Failed to notify {} of friend request: {:?}", target.id, e);
        }

        let message = format!("Friend request sent to {}", target.visible_name());
        Ok((request, message))
    }

    /// Accept or decline a pending request addressed to the caller. A request
    /// that is missing, already resolved, or addressed to someone else all
    /// answer the same way.
    pub async fn respond_to_request(
        &self,
        caller_id: &str,
        request_id: &Uuid,
        action: RespondAction,
    ) -> Result<&'static str, error::SystemError> {
        let request = self
            .repo
            .find_by_id(request_id)
            .await?
            .filter(|r| r.target_id == caller_id && r.status == FriendRequestStatus::Pending)
            .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        let message = match action {
            RespondAction::Accept => {
                self.repo.set_status(request_id, FriendRequestStatus::Accepted).await?;
                if let Err(e) = self
                    .repo
                    .upsert_mutual_follow(&request.requester_id, &request.target_id)
                    .await
                {
                    error!(
                        "Failed to create mutual follow for request {}: {:?}",
                        request_id, e
                    );
                }
                "Friend request accepted"
            }
            RespondAction::Decline => {
                self.repo.set_status(request_id, FriendRequestStatus::Declined).await?;
                "Friend request declined"
            }
        };

        if let Err(e) = self
            .notifications
            .mark_friend_request_read(caller_id, request_id)
            .await
        {
            warn!("Failed to mark request notification read: {:?}", e);
        }

        Ok(message)
    }

    pub async fn list_friends(
        &self,
        caller_id: &str,
    ) -> Result<Vec<ProfileResponse>, error::SystemError> {
        let ids = self.repo.find_friend_ids(caller_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let profiles = self.profiles.find_by_ids(&ids).await?;
        Ok(profiles.into_iter().map(ProfileResponse::from).collect())
    }

    pub async fn list_requests(
        &self,
        caller_id: &str,
    ) -> Result<Vec<PendingRequestView>, error::SystemError> {
        let pending = self.repo.list_pending_for(caller_id).await?;
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        let requester_ids: Vec<String> =
            pending.iter().map(|r| r.requester_id.clone()).collect();
        let profiles: HashMap<String, _> = self
            .profiles
            .find_by_ids(&requester_ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(pending
            .into_iter()
            .map(|request| {
                let profile = profiles.get(&request.requester_id);
                PendingRequestView {
                    id: request.id,
                    requester_name: profile
                        .map(|p| p.visible_name().to_string())
                        .unwrap_or_else(|| request.requester_id.clone()),
                    requester_avatar_url: profile.and_then(|p| p.avatar_url.clone()),
                    requester_id: request.requester_id,
                    created_at: request.created_at,
                }
            })
            .collect())
    }

    pub async fn are_friends(&self, a: &str, b: &str) -> Result<bool, error::SystemError> {
        Ok(self.repo.find_friend_ids(a).await?.iter().any(|id| id == b))
    }

    /// Friends' fixed-pool rankings over one source, for side-by-side
    /// comparison with the caller's own.
    pub async fn friends_rankings(
        &self,
        caller_id: &str,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let ids = self.repo.find_friend_ids(caller_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.rankings
            .list_fixed_pool_for_owners(&ids, source_type, source_id)
            .await
    }
}

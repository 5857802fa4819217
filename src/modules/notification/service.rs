use std::sync::Arc;

use uuid::Uuid;

use crate::api::error;
use crate::modules::notification::{
    hub::NotificationHub,
    repository::NotificationRepository,
    schema::{NotificationEntity, NotificationType},
};

#[derive(Clone)]
pub struct NotificationService<N>
where
    N: NotificationRepository + Send + Sync,
{
    repo: Arc<N>,
    hub: NotificationHub,
}

impl<N> NotificationService<N>
where
    N: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(repo: Arc<N>, hub: NotificationHub) -> Self {
        NotificationService { repo, hub }
    }

    /// Append a notification and fan it out to the recipient's open streams.
    /// No dedup: repeated events produce repeated rows.
    pub async fn create(
        &self,
        recipient_id: &str,
        kind: NotificationType,
        data: serde_json::Value,
    ) -> Result<NotificationEntity, error::SystemError> {
        let notification = self.repo.insert(recipient_id, kind, data).await?;
        self.hub.publish(&notification);
        Ok(notification)
    }

    pub async fn list(
        &self,
        user_id: &str,
        limit: i64,
        unread_only: bool,
    ) -> Result<Vec<NotificationEntity>, error::SystemError> {
        self.repo.list(user_id, limit, unread_only).await
    }

    pub async fn mark_read(
        &self,
        user_id: &str,
        ids: &[Uuid],
    ) -> Result<u64, error::SystemError> {
        self.repo.mark_read(user_id, ids).await
    }

    pub async fn mark_all_read(&self, user_id: &str) -> Result<u64, error::SystemError> {
        self.repo.mark_all_read(user_id).await
    }

    pub async fn mark_friend_request_read(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        self.repo.mark_friend_request_read(user_id, request_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fakes::FakeDb;

    fn service(db: Arc<FakeDb>) -> NotificationService<FakeDb> {
        NotificationService::with_dependencies(db, NotificationHub::new())
    }

    #[tokio::test]
    async fn create_publishes_to_open_streams() {
        let db = Arc::new(FakeDb::new());
        let hub = NotificationHub::new();
        let svc = NotificationService::with_dependencies(db, hub.clone());
        let (_, mut rx) = hub.subscribe("alice");

        svc.create("alice", NotificationType::RankingLike, serde_json::json!({ "x": 1 }))
            .await
            .unwrap();

        let pushed = rx.recv().await.unwrap();
        assert_eq!(pushed.user_id, "alice");
        assert!(!pushed.is_read);
    }

    #[tokio::test]
    async fn list_newest_first_with_unread_filter() {
        let db = Arc::new(FakeDb::new());
        let svc = service(db);

        let first = svc
            .create("alice", NotificationType::FriendRequest, serde_json::json!({}))
            .await
            .unwrap();
        let second = svc
            .create("alice", NotificationType::RankingLike, serde_json::json!({}))
            .await
            .unwrap();

        let all = svc.list("alice", 20, false).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);

        svc.mark_read("alice", &[second.id]).await.unwrap();
        let unread = svc.list("alice", 20, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, first.id);
    }

    #[tokio::test]
    async fn mark_all_read_touches_only_that_user() {
        let db = Arc::new(FakeDb::new());
        let svc = service(db.clone());

        svc.create("alice", NotificationType::FriendRequest, serde_json::json!({}))
            .await
            .unwrap();
        svc.create("alice", NotificationType::RankingLike, serde_json::json!({}))
            .await
            .unwrap();
        svc.create("bob", NotificationType::RankingLike, serde_json::json!({}))
            .await
            .unwrap();

        let flipped = svc.mark_all_read("alice").await.unwrap();
        assert_eq!(flipped, 2);

        assert!(svc.list("alice", 20, true).await.unwrap().is_empty());
        assert_eq!(svc.list("bob", 20, true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mark_read_ignores_other_users_ids() {
        let db = Arc::new(FakeDb::new());
        let svc = service(db);

        let bobs = svc
            .create("bob", NotificationType::RankingLike, serde_json::json!({}))
            .await
            .unwrap();

        let flipped = svc.mark_read("alice", &[bobs.id]).await.unwrap();
        assert_eq!(flipped, 0);
        assert_eq!(svc.list("bob", 20, true).await.unwrap().len(), 1);
    }
}

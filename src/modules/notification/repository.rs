use uuid::Uuid;

use crate::api::error;
use crate::modules::notification::schema::{NotificationEntity, NotificationType};

#[async_trait::async_trait]
pub trait NotificationRepository {
    /// Append-only; duplicate notifications for repeated events are expected.
    async fn insert(
        &self,
        user_id: &str,
        kind: NotificationType,
        data: serde_json::Value,
    ) -> Result<NotificationEntity, error::SystemError>;

    async fn list(
        &self,
        user_id: &str,
        limit: i64,
        unread_only: bool,
    ) -> Result<Vec<NotificationEntity>, error::SystemError>;

    async fn mark_read(&self, user_id: &str, ids: &[Uuid]) -> Result<u64, error::SystemError>;

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, error::SystemError>;

    /// Flip the friend-request notification that carries this request id.
    async fn mark_friend_request_read(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<(), error::SystemError>;
}

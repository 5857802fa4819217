use uuid::Uuid;

use crate::{
    api::error,
    modules::notification::{
        repository::NotificationRepository,
        schema::{NotificationEntity, NotificationType},
    },
};

#[derive(Clone)]
pub struct NotificationRepositoryPg {
    pool: sqlx::PgPool,
}

impl NotificationRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl NotificationRepository for NotificationRepositoryPg {
    async fn insert(
        &self,
        user_id: &str,
        kind: NotificationType,
        data: serde_json::Value,
    ) -> Result<NotificationEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let notification = sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (id, user_id, type, data)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(kind)
        .bind(&data)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn list(
        &self,
        user_id: &str,
        limit: i64,
        unread_only: bool,
    ) -> Result<Vec<NotificationEntity>, error::SystemError> {
        let notifications = sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
              AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    async fn mark_read(&self, user_id: &str, ids: &[Uuid]) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND id = ANY($2)",
        )
        .bind(user_id)
        .bind(ids)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows)
    }

    async fn mark_friend_request_read(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE user_id = $1
              AND type = 'friend_request'
              AND data->>'friend_request_id' = $2
            "#,
        )
        .bind(user_id)
        .bind(request_id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

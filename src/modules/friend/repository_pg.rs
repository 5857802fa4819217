use uuid::Uuid;

use crate::{
    api::error,
    modules::friend::{
        repository::{FollowRepository, FriendRequestRepository},
        schema::{FriendRequestEntity, FriendRequestStatus},
    },
};

#[derive(Clone)]
pub struct FriendRepositoryPg {
    pool: sqlx::PgPool,
}

impl FriendRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FollowRepository for FriendRepositoryPg {
    async fn upsert_mutual_follow(&self, a: &str, b: &str) -> Result<(), error::SystemError> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2), ($2, $1)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_friend_ids(&self, user_id: &str) -> Result<Vec<String>, error::SystemError> {
        let ids = sqlx::query_scalar::<_, String>(
            r#"
            SELECT f1.following_id
            FROM follows f1
            JOIN follows f2
              ON f2.follower_id = f1.following_id
             AND f2.following_id = f1.follower_id
            WHERE f1.follower_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FriendRepositoryPg {
    async fn find_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT * FROM friend_requests
            WHERE (requester_id = $1 AND target_id = $2)
               OR (requester_id = $2 AND target_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            "SELECT * FROM friend_requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }

    async fn insert(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let request = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            INSERT INTO friend_requests (id, requester_id, target_id, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<(), error::SystemError> {
        sqlx::query("UPDATE friend_requests SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_pending_for(
        &self,
        target_id: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        let requests = sqlx::query_as::<_, FriendRequestEntity>(
            r#"
            SELECT * FROM friend_requests
            WHERE target_id = $1 AND status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .bind(target_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }
}

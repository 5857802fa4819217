use uuid::Uuid;

use crate::{
    api::error,
    modules::ranking::{
        model::{InsertRanking, NewRankingItem, UpdateRanking},
        repository::RankingRepository,
        schema::{RankingEntity, RankingItemEntity, RankingSummary, SourceType, Visibility},
    },
};

#[derive(Clone)]
pub struct RankingRepositoryPg {
    pool: sqlx::PgPool,
}

impl RankingRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl RankingRepository for RankingRepositoryPg {
    async fn insert(
        &self,
        ranking: &InsertRanking,
    ) -> Result<RankingEntity, error::SystemError> {
        let id = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        let created = sqlx::query_as::<_, RankingEntity>(
            r#"
            INSERT INTO rankings
                (id, user_id, title, description, ranking_type, visibility,
                 source_type, source_id, source_variant, pool_item_ids)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&ranking.user_id)
        .bind(&ranking.title)
        .bind(&ranking.description)
        .bind(ranking.ranking_type)
        .bind(ranking.visibility)
        .bind(ranking.source_type)
        .bind(&ranking.source_id)
        .bind(ranking.source_variant)
        .bind(&ranking.pool_item_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: &Uuid,
        owner_id: &str,
        update: &UpdateRanking,
    ) -> Result<Option<RankingEntity>, error::SystemError> {
        let updated = sqlx::query_as::<_, RankingEntity>(
            r#"
            UPDATE rankings
            SET
                title          = $3,
                description    = $4,
                ranking_type   = $5,
                visibility     = $6,
                source_type    = $7,
                source_id      = $8,
                source_variant = $9,
                pool_item_ids  = $10,
                updated_at     = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.ranking_type)
        .bind(update.visibility)
        .bind(update.source_type)
        .bind(&update.source_id)
        .bind(update.source_variant)
        .bind(&update.pool_item_ids)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: &Uuid, owner_id: &str) -> Result<bool, error::SystemError> {
        let rows = sqlx::query("DELETE FROM rankings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows > 0)
    }

    async fn set_visibility(
        &self,
        id: &Uuid,
        owner_id: &str,
        visibility: Visibility,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "UPDATE rankings SET visibility = $3, updated_at = NOW() WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(visibility)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RankingEntity>, error::SystemError> {
        let ranking =
            sqlx::query_as::<_, RankingEntity>("SELECT * FROM rankings WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(ranking)
    }

    async fn max_source_variant(
        &self,
        owner_id: &str,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<i32, error::SystemError> {
        let max: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(source_variant), 0)
            FROM rankings
            WHERE user_id = $1 AND source_type = $2 AND source_id = $3
            "#,
        )
        .bind(owner_id)
        .bind(source_type)
        .bind(source_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(max)
    }

    async fn replace_items(
        &self,
        ranking_id: &Uuid,
        items: &[NewRankingItem],
    ) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM ranking_items WHERE ranking_id = $1")
            .bind(ranking_id)
            .execute(&self.pool)
            .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO ranking_items (ranking_id, item_id, position, notes)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(ranking_id)
            .bind(&item.item_id)
            .bind(item.position)
            .bind(&item.notes)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn find_items(
        &self,
        ranking_id: &Uuid,
    ) -> Result<Vec<RankingItemEntity>, error::SystemError> {
        let items = sqlx::query_as::<_, RankingItemEntity>(
            "SELECT * FROM ranking_items WHERE ranking_id = $1 ORDER BY position",
        )
        .bind(ranking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings = sqlx::query_as::<_, RankingSummary>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ranking_type, r.visibility,
                r.source_type, r.source_id, r.source_variant, r.created_at, r.updated_at,
                p.username, p.display_name,
                (SELECT COUNT(*) FROM ranking_items ri WHERE ri.ranking_id = r.id) AS item_count,
                (SELECT COUNT(*) FROM ranking_likes rl WHERE rl.ranking_id = r.id) AS like_count
            FROM rankings r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.user_id = $1
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rankings)
    }

    async fn list_public(&self, limit: i64) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings = sqlx::query_as::<_, RankingSummary>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ranking_type, r.visibility,
                r.source_type, r.source_id, r.source_variant, r.created_at, r.updated_at,
                p.username, p.display_name,
                (SELECT COUNT(*) FROM ranking_items ri WHERE ri.ranking_id = r.id) AS item_count,
                (SELECT COUNT(*) FROM ranking_likes rl WHERE rl.ranking_id = r.id) AS like_count
            FROM rankings r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.visibility = 'public'
            ORDER BY r.updated_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rankings)
    }

    async fn list_for_friends(
        &self,
        owner_ids: &[String],
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings = sqlx::query_as::<_, RankingSummary>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ranking_type, r.visibility,
                r.source_type, r.source_id, r.source_variant, r.created_at, r.updated_at,
                p.username, p.display_name,
                (SELECT COUNT(*) FROM ranking_items ri WHERE ri.ranking_id = r.id) AS item_count,
                (SELECT COUNT(*) FROM ranking_likes rl WHERE rl.ranking_id = r.id) AS like_count
            FROM rankings r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.user_id = ANY($1)
              AND r.visibility IN ('public', 'friends')
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(owner_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rankings)
    }

    async fn list_fixed_pool_for_owners(
        &self,
        owner_ids: &[String],
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings = sqlx::query_as::<_, RankingSummary>(
            r#"
            SELECT
                r.id, r.user_id, r.title, r.description, r.ranking_type, r.visibility,
                r.source_type, r.source_id, r.source_variant, r.created_at, r.updated_at,
                p.username, p.display_name,
                (SELECT COUNT(*) FROM ranking_items ri WHERE ri.ranking_id = r.id) AS item_count,
                (SELECT COUNT(*) FROM ranking_likes rl WHERE rl.ranking_id = r.id) AS like_count
            FROM rankings r
            JOIN profiles p ON p.id = r.user_id
            WHERE r.user_id = ANY($1)
              AND r.source_type = $2
              AND r.source_id = $3
              AND r.visibility IN ('public', 'friends')
            ORDER BY r.updated_at DESC
            "#,
        )
        .bind(owner_ids)
        .bind(source_type)
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rankings)
    }

    async fn insert_like(
        &self,
        ranking_id: &Uuid,
        user_id: &str,
    ) -> Result<bool, error::SystemError> {
        let rows = sqlx::query(
            "INSERT INTO ranking_likes (ranking_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(ranking_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows > 0)
    }

    async fn delete_like(
        &self,
        ranking_id: &Uuid,
        user_id: &str,
    ) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM ranking_likes WHERE ranking_id = $1 AND user_id = $2")
            .bind(ranking_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

use uuid::Uuid;

use crate::api::error;
use crate::modules::ranking::model::{InsertRanking, NewRankingItem, UpdateRanking};
use crate::modules::ranking::schema::{
    RankingEntity, RankingItemEntity, RankingSummary, SourceType, Visibility,
};

#[async_trait::async_trait]
pub trait RankingRepository {
    async fn insert(&self, ranking: &InsertRanking)
    -> Result<RankingEntity, error::SystemError>;

    /// Owner-scoped in-place update. `None` when no row matched the
    /// (id, owner) pair; callers report that as not found.
    async fn update(
        &self,
        id: &Uuid,
        owner_id: &str,
        update: &UpdateRanking,
    ) -> Result<Option<RankingEntity>, error::SystemError>;

    async fn delete(&self, id: &Uuid, owner_id: &str) -> Result<bool, error::SystemError>;

    async fn set_visibility(
        &self,
        id: &Uuid,
        owner_id: &str,
        visibility: Visibility,
    ) -> Result<bool, error::SystemError>;

    async fn find_by_id(&self, id: &Uuid)
    -> Result<Option<RankingEntity>, error::SystemError>;

    /// Highest variant so far for this (owner, source) pool, 0 when none.
    /// Read-then-write: the caller adds 1 without a transactional guard.
    async fn max_source_variant(
        &self,
        owner_id: &str,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<i32, error::SystemError>;

    /// Full rewrite of the ordered item set: delete everything, re-insert.
    async fn replace_items(
        &self,
        ranking_id: &Uuid,
        items: &[NewRankingItem],
    ) -> Result<(), error::SystemError>;

    async fn find_items(
        &self,
        ranking_id: &Uuid,
    ) -> Result<Vec<RankingItemEntity>, error::SystemError>;

    async fn list_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError>;

    async fn list_public(&self, limit: i64) -> Result<Vec<RankingSummary>, error::SystemError>;

    /// Rankings by the given owners with `public` or `friends` visibility.
    async fn list_for_friends(
        &self,
        owner_ids: &[String],
    ) -> Result<Vec<RankingSummary>, error::SystemError>;

    /// Fixed-pool rankings by the given owners over one (source type, source
    /// id) pool, for side-by-side comparison.
    async fn list_fixed_pool_for_owners(
        &self,
        owner_ids: &[String],
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError>;

    /// Returns whether a new like row was inserted.
    async fn insert_like(
        &self,
        ranking_id: &Uuid,
        user_id: &str,
    ) -> Result<bool, error::SystemError>;

    async fn delete_like(&self, ranking_id: &Uuid, user_id: &str)
    -> Result<(), error::SystemError>;
}

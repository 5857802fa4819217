use serde::{Deserialize, Serialize};
use sqlx::prelude::{FromRow, Type};
use uuid::Uuid;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "ranking_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RankingType {
    Artists,
    Albums,
    Songs,
}

/// Per-ranking access scope. Any value may transition to any other, always
/// by the owner only.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "ranking_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Friends,
    Private,
}

/// Provenance of a fixed-pool ranking: the artist discography or album
/// tracklist the candidate pool was derived from.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Type, Serialize, Deserialize)]
#[sqlx(type_name = "pool_source_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Artist,
    Album,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingEntity {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub ranking_type: RankingType,
    pub visibility: Visibility,
    pub source_type: Option<SourceType>,
    pub source_id: Option<String>,
    pub source_variant: Option<i32>,
    pub pool_item_ids: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Positions within a ranking are a dense 1..N sequence, maintained by
/// rewriting the whole set on every save.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingItemEntity {
    pub ranking_id: Uuid,
    pub item_id: String,
    pub position: i32,
    pub notes: Option<String>,
}

/// List-view row: ranking fields plus owner display fields and aggregate
/// item/like counts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RankingSummary {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub ranking_type: RankingType,
    pub visibility: Visibility,
    pub source_type: Option<SourceType>,
    pub source_id: Option<String>,
    pub source_variant: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub item_count: i64,
    pub like_count: i64,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::catalog::model::{CatalogItem, ItemMeta};
use crate::modules::ranking::schema::{RankingEntity, RankingType, SourceType, Visibility};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveRankingBody {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub ranking_type: RankingType,
    pub visibility: Visibility,
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub pool_items: Vec<CatalogItem>,
    pub source_type: Option<SourceType>,
    pub source_id: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct ChangeVisibilityBody {
    pub visibility: Visibility,
}

pub struct InsertRanking {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub ranking_type: RankingType,
    pub visibility: Visibility,
    pub source_type: Option<SourceType>,
    pub source_id: Option<String>,
    pub source_variant: Option<i32>,
    pub pool_item_ids: Vec<String>,
}

pub struct UpdateRanking {
    pub title: String,
    pub description: Option<String>,
    pub ranking_type: RankingType,
    pub visibility: Visibility,
    pub source_type: Option<SourceType>,
    pub source_id: Option<String>,
    pub source_variant: Option<i32>,
    pub pool_item_ids: Vec<String>,
}

pub struct NewRankingItem {
    pub item_id: String,
    pub position: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedRanking {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingOwner {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingItemView {
    pub item_id: String,
    pub position: i32,
    pub notes: Option<String>,
}

/// A ranking with its positionally ordered items and an unordered metadata
/// list keyed by item id; callers join the two by id.
#[derive(Debug, Clone, Serialize)]
pub struct FullRankingResponse {
    pub ranking: RankingEntity,
    pub owner: Option<RankingOwner>,
    pub items: Vec<RankingItemView>,
    pub item_meta: Vec<ItemMeta>,
}

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use uuid::Uuid;

use crate::api::error;
use crate::modules::catalog::{
    model::{CatalogBatch, CatalogItem, ItemMeta},
    repository::CatalogRepository,
};
use crate::modules::friend::repository::FollowRepository;
use crate::modules::notification::{
    repository::NotificationRepository, schema::NotificationType, service::NotificationService,
};
use crate::modules::profile::{repository::ProfileRepository, service::ensure_profile};
use crate::modules::ranking::{
    model::{
        CreatedRanking, FullRankingResponse, InsertRanking, NewRankingItem, RankingItemView,
        RankingOwner, SaveRankingBody, UpdateRanking,
    },
    repository::RankingRepository,
    schema::{RankingEntity, RankingSummary, RankingType, SourceType, Visibility},
};

const PUBLIC_FEED_LIMIT: i64 = 50;

pub struct RankingService<K, C, P, F, N>
where
    K: RankingRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
    F: FollowRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    rankings: Arc<K>,
    catalog: Arc<C>,
    profiles: Arc<P>,
    follows: Arc<F>,
    notifications: Arc<NotificationService<N>>,
}

impl<K, C, P, F, N> RankingService<K, C, P, F, N>
where
    K: RankingRepository + Send + Sync,
    C: CatalogRepository + Send + Sync,
    P: ProfileRepository + Send + Sync,
    F: FollowRepository + Send + Sync,
    N: NotificationRepository + Send + Sync,
{
    pub fn with_dependencies(
        rankings: Arc<K>,
        catalog: Arc<C>,
        profiles: Arc<P>,
        follows: Arc<F>,
        notifications: Arc<NotificationService<N>>,
    ) -> Self {
        RankingService { rankings, catalog, profiles, follows, notifications }
    }

    pub async fn create(
        &self,
        user_id: &str,
        body: SaveRankingBody,
    ) -> Result<CreatedRanking, error::SystemError> {
        let body = validate_save(body)?;

        ensure_profile(&*self.profiles, user_id).await?;
        self.upsert_catalog(&body).await;

        let source_variant = match (body.source_type, body.source_id.as_deref()) {
            (Some(source_type), Some(source_id)) => Some(
                self.rankings
                    .max_source_variant(user_id, source_type, source_id)
                    .await?
                    + 1,
            ),
            _ => None,
        };

        let insert = InsertRanking {
            user_id: user_id.to_string(),
            title: body.title.clone(),
            description: body.description.clone(),
            ranking_type: body.ranking_type,
            visibility: body.visibility,
            source_type: body.source_type,
            source_id: body.source_id.clone(),
            source_variant,
            pool_item_ids: pool_ids(&body),
        };

        // Row first, items second. No transaction; a failure in between
        // leaves an empty ranking the owner can re-save or delete.
        let ranking = self.rankings.insert(&insert).await?;
        self.rankings.replace_items(&ranking.id, &ranked_items(&body.items)).await?;

        Ok(CreatedRanking { id: ranking.id })
    }

    pub async fn update(
        &self,
        user_id: &str,
        id: &Uuid,
        body: SaveRankingBody,
    ) -> Result<RankingEntity, error::SystemError> {
        let existing = self
            .rankings
            .find_by_id(id)
            .await?
            .filter(|r| r.user_id == user_id)
            .ok_or_else(|| error::SystemError::not_found("Ranking not found"))?;

        let body = validate_save(body)?;
        self.upsert_catalog(&body).await;

        // The variant number identifies one attempt over a pool; it is kept
        // across edits and reassigned only when the pool itself changes.
        let source_variant = if existing.source_type == body.source_type
            && existing.source_id == body.source_id
        {
            existing.source_variant
        } else {
            match (body.source_type, body.source_id.as_deref()) {
                (Some(source_type), Some(source_id)) => Some(
                    self.rankings
                        .max_source_variant(user_id, source_type, source_id)
                        .await?
                        + 1,
                ),
                _ => None,
            }
        };

        let update = UpdateRanking {
            title: body.title.clone(),
            description: body.description.clone(),
            ranking_type: body.ranking_type,
            visibility: body.visibility,
            source_type: body.source_type,
            source_id: body.source_id.clone(),
            source_variant,
            pool_item_ids: pool_ids(&body),
        };

        let updated = self
            .rankings
            .update(id, user_id, &update)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Ranking not found"))?;
        self.rankings.replace_items(id, &ranked_items(&body.items)).await?;

        Ok(updated)
    }

    pub async fn delete(&self, user_id: &str, id: &Uuid) -> Result<(), error::SystemError> {
        if !self.rankings.delete(id, user_id).await? {
            return Err(error::SystemError::not_found("Ranking not found"));
        }
        Ok(())
    }

    pub async fn change_visibility(
        &self,
        user_id: &str,
        id: &Uuid,
        visibility: Visibility,
    ) -> Result<(), error::SystemError> {
        if !self.rankings.set_visibility(id, user_id, visibility).await? {
            return Err(error::SystemError::not_found("Ranking not found"));
        }
        Ok(())
    }

    /// The full ranking as the viewer is allowed to see it. A missing row and
    /// a row outside the viewer's scope both come back as `None`.
    pub async fn get_full(
        &self,
        viewer_id: &str,
        id: &Uuid,
    ) -> Result<Option<FullRankingResponse>, error::SystemError> {
        let Some(ranking) = self.rankings.find_by_id(id).await? else {
            return Ok(None);
        };

        let visible = ranking.user_id == viewer_id
            || ranking.visibility == Visibility::Public
            || (ranking.visibility == Visibility::Friends
                && self
                    .follows
                    .find_friend_ids(viewer_id)
                    .await?
                    .contains(&ranking.user_id));
        if !visible {
            return Ok(None);
        }

        let items = self.rankings.find_items(id).await?;
        let owner = self.profiles.find_by_id(&ranking.user_id).await?.map(|p| RankingOwner {
            username: p.username,
            display_name: p.display_name,
            avatar_url: p.avatar_url,
        });

        // Metadata covers ranked and pool items so the editor can reopen the
        // ranking without refetching the catalog.
        let mut meta_ids: Vec<String> = items.iter().map(|i| i.item_id.clone()).collect();
        for pool_id in &ranking.pool_item_ids {
            if !meta_ids.contains(pool_id) {
                meta_ids.push(pool_id.clone());
            }
        }
        let item_meta = self.load_metadata(ranking.ranking_type, &meta_ids).await?;

        Ok(Some(FullRankingResponse {
            ranking,
            owner,
            items: items
                .into_iter()
                .map(|i| RankingItemView {
                    item_id: i.item_id,
                    position: i.position,
                    notes: i.notes,
                })
                .collect(),
            item_meta,
        }))
    }

    pub async fn list_mine(
        &self,
        user_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        self.rankings.list_for_owner(user_id).await
    }

    pub async fn list_public(&self) -> Result<Vec<RankingSummary>, error::SystemError> {
        self.rankings.list_public(PUBLIC_FEED_LIMIT).await
    }

    pub async fn list_friends(
        &self,
        user_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let friend_ids = self.follows.find_friend_ids(user_id).await?;
        if friend_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.rankings.list_for_friends(&friend_ids).await
    }

    /// Idempotent like. The first like from a non-owner appends a
    /// notification for the owner; repeats are silent.
    pub async fn like(&self, user_id: &str, id: &Uuid) -> Result<(), error::SystemError> {
        let ranking = self
            .rankings
            .find_by_id(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Ranking not found"))?;

        // The likes table references profiles; a first-time liker may not
        // have a row yet.
        let liker = ensure_profile(&*self.profiles, user_id).await?;

        let inserted = self.rankings.insert_like(id, user_id).await?;
        if inserted && ranking.user_id != user_id {
            let liker_name = liker.visible_name().to_string();

            let data = serde_json::json!({
                "ranking_id": id,
                "ranking_title": ranking.title,
                "liker_id": user_id,
                "liker_name": liker_name,
            });
            if let Err(e) = self
                .notifications
                .create(&ranking.user_id, NotificationType::RankingLike, data)
                .await
            {
                warn!("Failed to notify {} of like on {}: {:?}", ranking.user_id, id, e);
            }
        }

        Ok(())
    }

    pub async fn unlike(&self, user_id: &str, id: &Uuid) -> Result<(), error::SystemError> {
        self.rankings.delete_like(id, user_id).await
    }

    async fn upsert_catalog(&self, body: &SaveRankingBody) {
        let batch = CatalogBatch::from_items(body.items.iter().chain(body.pool_items.iter()));
        if batch.is_empty() {
            return;
        }
        // The catalog is a display cache; a failed upsert must not lose the
        // user's ranking.
        if let Err(e) = self.catalog.upsert_batch(&batch).await {
            warn!("Catalog upsert failed, saving ranking anyway: {:?}", e);
        }
    }

    async fn load_metadata(
        &self,
        ranking_type: RankingType,
        ids: &[String],
    ) -> Result<Vec<ItemMeta>, error::SystemError> {
        match ranking_type {
            RankingType::Artists => {
                let artists = self.catalog.find_artists(ids).await?;
                Ok(artists
                    .into_iter()
                    .map(|a| ItemMeta {
                        id: a.id,
                        name: a.name,
                        image_url: a.image_url,
                        duration_ms: None,
                        artist_name: None,
                    })
                    .collect())
            }
            RankingType::Albums => {
                let albums = self.catalog.find_albums(ids).await?;
                let artist_names = self.artist_names(albums.iter().map(|a| &a.artist_id)).await?;
                Ok(albums
                    .into_iter()
                    .map(|a| ItemMeta {
                        id: a.id,
                        name: a.name,
                        image_url: a.image_url,
                        duration_ms: None,
                        artist_name: artist_names.get(&a.artist_id).cloned(),
                    })
                    .collect())
            }
            RankingType::Songs => {
                let tracks = self.catalog.find_tracks(ids).await?;
                let artist_names = self.artist_names(tracks.iter().map(|t| &t.artist_id)).await?;
                Ok(tracks
                    .into_iter()
                    .map(|t| ItemMeta {
                        id: t.id,
                        name: t.name,
                        image_url: t.image_url,
                        duration_ms: t.duration_ms,
                        artist_name: artist_names.get(&t.artist_id).cloned(),
                    })
                    .collect())
            }
        }
    }

    async fn artist_names(
        &self,
        artist_ids: impl Iterator<Item = &String>,
    ) -> Result<HashMap<String, String>, error::SystemError> {
        let mut ids: Vec<String> = Vec::new();
        for id in artist_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let artists = self.catalog.find_artists(&ids).await?;
        Ok(artists.into_iter().map(|a| (a.id, a.name)).collect())
    }
}

fn validate_save(mut body: SaveRankingBody) -> Result<SaveRankingBody, error::SystemError> {
    body.title = body.title.trim().to_string();
    if body.title.is_empty() {
        return Err(error::SystemError::bad_request("Title is required"));
    }
    if body.items.is_empty() {
        return Err(error::SystemError::bad_request("At least one item is required"));
    }
    // Item ids are unique per ranking; a repeat would trip the table
    // constraint halfway through the item rewrite.
    for (index, item) in body.items.iter().enumerate() {
        if body.items[..index].iter().any(|other| other.id() == item.id()) {
            return Err(error::SystemError::bad_request("Duplicate items in ranking"));
        }
    }
    if body.source_type.is_some() != body.source_id.is_some() {
        return Err(error::SystemError::bad_request(
            "sourceType and sourceId must be provided together",
        ));
    }
    Ok(body)
}

fn ranked_items(items: &[CatalogItem]) -> Vec<NewRankingItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| NewRankingItem {
            item_id: item.id().to_string(),
            position: index as i32 + 1,
            notes: None,
        })
        .collect()
}

fn pool_ids(body: &SaveRankingBody) -> Vec<String> {
    body.pool_items.iter().map(|item| item.id().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::notification::hub::NotificationHub;
    use crate::test::fakes::FakeDb;

    type Svc = RankingService<FakeDb, FakeDb, FakeDb, FakeDb, FakeDb>;

    fn service(db: &Arc<FakeDb>) -> Svc {
        let notifications = Arc::new(NotificationService::with_dependencies(
            db.clone(),
            NotificationHub::new(),
        ));
        RankingService::with_dependencies(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            notifications,
        )
    }

    fn track(id: &str) -> CatalogItem {
        CatalogItem::Track {
            id: id.to_string(),
            name: format!("track {id}"),
            image_url: None,
            duration_ms: Some(180_000),
            artist_id: "artist-1".to_string(),
            artist_name: Some("Artist One".to_string()),
            album_id: Some("album-1".to_string()),
        }
    }

    fn body(title: &str, items: Vec<CatalogItem>) -> SaveRankingBody {
        SaveRankingBody {
            title: title.to_string(),
            description: None,
            ranking_type: RankingType::Songs,
            visibility: Visibility::Private,
            items,
            pool_items: Vec::new(),
            source_type: None,
            source_id: None,
        }
    }

    fn fixed_pool_body(title: &str, items: Vec<CatalogItem>) -> SaveRankingBody {
        SaveRankingBody {
            source_type: Some(SourceType::Album),
            source_id: Some("album-1".to_string()),
            ..body(title, items)
        }
    }

    #[tokio::test]
    async fn create_assigns_dense_positions_from_order() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc
            .create("alice", body("My songs", vec![track("t2"), track("t1"), track("t3")]))
            .await
            .unwrap();

        let items = db.find_items(&created.id).await.unwrap();
        assert_eq!(
            items.iter().map(|i| (i.item_id.as_str(), i.position)).collect::<Vec<_>>(),
            vec![("t2", 1), ("t1", 2), ("t3", 3)]
        );
    }

    #[tokio::test]
    async fn create_ensures_profile_and_upserts_catalog() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        svc.create("alice", body("My songs", vec![track("t1")])).await.unwrap();

        assert!(db.has_profile("alice"));
        let tracks = db.find_tracks(&["t1".to_string()]).await.unwrap();
        assert_eq!(tracks.len(), 1);
        let artists = db.find_artists(&["artist-1".to_string()]).await.unwrap();
        assert_eq!(artists[0].name, "Artist One");
    }

    #[tokio::test]
    async fn blank_title_and_empty_items_are_rejected() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let err = svc.create("alice", body("   ", vec![track("t1")])).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let err = svc.create("alice", body("Songs", Vec::new())).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn duplicate_item_ids_are_rejected_at_the_boundary() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let err = svc
            .create("alice", body("Dupes", vec![track("t1"), track("t1")]))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        let created = svc
            .create("alice", body("Songs", vec![track("t1"), track("t2")]))
            .await
            .unwrap();
        let err = svc
            .update("alice", &created.id, body("Songs", vec![track("t2"), track("t2")]))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));

        // The rejected update must not have touched the stored item set.
        let items = db.find_items(&created.id).await.unwrap();
        assert_eq!(
            items.iter().map(|i| (i.item_id.as_str(), i.position)).collect::<Vec<_>>(),
            vec![("t1", 1), ("t2", 2)]
        );
    }

    #[tokio::test]
    async fn source_fields_must_come_together() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let mut half = body("Songs", vec![track("t1")]);
        half.source_type = Some(SourceType::Album);
        let err = svc.create("alice", half).await.unwrap_err();
        assert!(matches!(err, error::SystemError::BadRequest(_)));
    }

    #[tokio::test]
    async fn fixed_pool_saves_get_sequential_variants() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let first = svc
            .create("alice", fixed_pool_body("Take one", vec![track("t1")]))
            .await
            .unwrap();
        let second = svc
            .create("alice", fixed_pool_body("Take two", vec![track("t1")]))
            .await
            .unwrap();

        let first = db.find_by_ranking_id(&first.id).unwrap();
        let second = db.find_by_ranking_id(&second.id).unwrap();
        assert_eq!(first.source_variant, Some(1));
        assert_eq!(second.source_variant, Some(2));
    }

    #[tokio::test]
    async fn update_replaces_the_item_set_wholesale() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc
            .create("alice", body("Songs", vec![track("t1"), track("t2"), track("t3")]))
            .await
            .unwrap();
        svc.update("alice", &created.id, body("Songs", vec![track("t3"), track("t1")]))
            .await
            .unwrap();

        let items = db.find_items(&created.id).await.unwrap();
        assert_eq!(
            items.iter().map(|i| (i.item_id.as_str(), i.position)).collect::<Vec<_>>(),
            vec![("t3", 1), ("t1", 2)]
        );
    }

    #[tokio::test]
    async fn update_keeps_the_variant_when_the_pool_is_unchanged() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc
            .create("alice", fixed_pool_body("Take one", vec![track("t1")]))
            .await
            .unwrap();
        let updated = svc
            .update("alice", &created.id, fixed_pool_body("Renamed", vec![track("t1")]))
            .await
            .unwrap();

        assert_eq!(updated.source_variant, Some(1));
    }

    #[tokio::test]
    async fn update_by_non_owner_is_not_found() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc.create("alice", body("Songs", vec![track("t1")])).await.unwrap();
        let err = svc
            .update("bob", &created.id, body("Hijack", vec![track("t1")]))
            .await
            .unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));
    }

    #[tokio::test]
    async fn get_full_is_none_for_missing_id() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let missing = Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext));
        assert!(svc.get_full("alice", &missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn private_rankings_are_hidden_from_everyone_else() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc.create("alice", body("Songs", vec![track("t1")])).await.unwrap();

        assert!(svc.get_full("alice", &created.id).await.unwrap().is_some());
        assert!(svc.get_full("bob", &created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn friends_visibility_needs_a_mutual_follow() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let mut save = body("Songs", vec![track("t1")]);
        save.visibility = Visibility::Friends;
        let created = svc.create("alice", save).await.unwrap();

        assert!(svc.get_full("bob", &created.id).await.unwrap().is_none());

        db.upsert_mutual_follow("alice", "bob").await.unwrap();
        assert!(svc.get_full("bob", &created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn get_full_resolves_track_metadata_with_artist_names() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc
            .create("alice", body("Songs", vec![track("t1"), track("t2")]))
            .await
            .unwrap();
        let full = svc.get_full("alice", &created.id).await.unwrap().unwrap();

        assert_eq!(full.items.len(), 2);
        assert_eq!(full.item_meta.len(), 2);
        let meta = full.item_meta.iter().find(|m| m.id == "t1").unwrap();
        assert_eq!(meta.artist_name.as_deref(), Some("Artist One"));
        assert_eq!(meta.duration_ms, Some(180_000));
    }

    #[tokio::test]
    async fn first_like_notifies_the_owner_but_self_likes_do_not() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let mut save = body("Songs", vec![track("t1")]);
        save.visibility = Visibility::Public;
        let created = svc.create("alice", save).await.unwrap();

        svc.like("bob", &created.id).await.unwrap();
        svc.like("bob", &created.id).await.unwrap();
        svc.like("alice", &created.id).await.unwrap();

        let notifications = db.list("alice", 20, false).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].data["liker_id"], serde_json::json!("bob"));
    }

    #[tokio::test]
    async fn delete_removes_the_ranking_for_its_owner_only() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let created = svc.create("alice", body("Songs", vec![track("t1")])).await.unwrap();

        let err = svc.delete("bob", &created.id).await.unwrap_err();
        assert!(matches!(err, error::SystemError::NotFound(_)));

        svc.delete("alice", &created.id).await.unwrap();
        assert!(svc.get_full("alice", &created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn friends_feed_is_empty_without_friends() {
        let db = Arc::new(FakeDb::new());
        let svc = service(&db);

        let mut save = body("Songs", vec![track("t1")]);
        save.visibility = Visibility::Friends;
        svc.create("alice", save).await.unwrap();

        assert!(svc.list_friends("bob").await.unwrap().is_empty());

        db.upsert_mutual_follow("alice", "bob").await.unwrap();
        let feed = svc.list_friends("bob").await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].user_id, "alice");
    }
}

//! In-memory implementations of the repository traits, shared by the
//! service-level tests. Single `FakeDb` so cross-module scenarios (accept a
//! request, then read the friend's rankings) run against one store.

use std::sync::Mutex;

use uuid::Uuid;

use crate::api::error;
use crate::modules::catalog::{
    model::CatalogBatch,
    repository::CatalogRepository,
    schema::{AlbumEntity, ArtistEntity, TrackEntity},
};
use crate::modules::friend::{
    repository::{FollowRepository, FriendRequestRepository},
    schema::{FriendRequestEntity, FriendRequestStatus},
};
use crate::modules::notification::{
    repository::NotificationRepository,
    schema::{NotificationEntity, NotificationType},
};
use crate::modules::profile::{
    model::{InsertProfile, UpdateProfileModel},
    repository::ProfileRepository,
    schema::ProfileEntity,
};
use crate::modules::ranking::{
    model::{InsertRanking, NewRankingItem, UpdateRanking},
    repository::RankingRepository,
    schema::{RankingEntity, RankingItemEntity, RankingSummary, SourceType, Visibility},
};

fn new_id() -> Uuid {
    Uuid::new_v7(uuid::Timestamp::now(uuid::NoContext))
}

#[derive(Default)]
pub struct FakeDb {
    profiles: Mutex<Vec<ProfileEntity>>,
    follows: Mutex<Vec<(String, String)>>,
    requests: Mutex<Vec<FriendRequestEntity>>,
    rankings: Mutex<Vec<RankingEntity>>,
    items: Mutex<Vec<RankingItemEntity>>,
    likes: Mutex<Vec<(Uuid, String)>>,
    artists: Mutex<Vec<ArtistEntity>>,
    albums: Mutex<Vec<AlbumEntity>>,
    tracks: Mutex<Vec<TrackEntity>>,
    notifications: Mutex<Vec<NotificationEntity>>,
}

impl FakeDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_profile(&self, id: &str, friend_code: &str) -> ProfileEntity {
        let profile = ProfileEntity {
            id: id.to_string(),
            username: None,
            display_name: None,
            avatar_url: None,
            friend_code: friend_code.to_string(),
            created_at: chrono::Utc::now(),
        };
        self.profiles.lock().unwrap().push(profile.clone());
        profile
    }

    pub fn seed_ranking(
        &self,
        owner_id: &str,
        visibility: Visibility,
        source_type: Option<SourceType>,
        source_id: Option<&str>,
    ) -> RankingEntity {
        let now = chrono::Utc::now();
        let ranking = RankingEntity {
            id: new_id(),
            user_id: owner_id.to_string(),
            title: "Seeded ranking".to_string(),
            description: None,
            ranking_type: crate::modules::ranking::schema::RankingType::Songs,
            visibility,
            source_type,
            source_id: source_id.map(str::to_string),
            source_variant: source_type.map(|_| 1),
            pool_item_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.rankings.lock().unwrap().push(ranking.clone());
        ranking
    }

    pub fn has_profile(&self, id: &str) -> bool {
        self.profiles.lock().unwrap().iter().any(|p| p.id == id)
    }

    pub fn find_by_ranking_id(&self, id: &Uuid) -> Option<RankingEntity> {
        self.rankings.lock().unwrap().iter().find(|r| r.id == *id).cloned()
    }

    fn summarize(&self, ranking: &RankingEntity) -> RankingSummary {
        let profiles = self.profiles.lock().unwrap();
        let profile = profiles.iter().find(|p| p.id == ranking.user_id);
        let item_count =
            self.items.lock().unwrap().iter().filter(|i| i.ranking_id == ranking.id).count();
        let like_count =
            self.likes.lock().unwrap().iter().filter(|(id, _)| *id == ranking.id).count();

        RankingSummary {
            id: ranking.id,
            user_id: ranking.user_id.clone(),
            title: ranking.title.clone(),
            description: ranking.description.clone(),
            ranking_type: ranking.ranking_type,
            visibility: ranking.visibility,
            source_type: ranking.source_type,
            source_id: ranking.source_id.clone(),
            source_variant: ranking.source_variant,
            created_at: ranking.created_at,
            updated_at: ranking.updated_at,
            username: profile.and_then(|p| p.username.clone()),
            display_name: profile.and_then(|p| p.display_name.clone()),
            item_count: item_count as i64,
            like_count: like_count as i64,
        }
    }

    fn summaries_newest_first(&self, mut rankings: Vec<RankingEntity>) -> Vec<RankingSummary> {
        rankings.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rankings.iter().map(|r| self.summarize(r)).collect()
    }
}

#[async_trait::async_trait]
impl ProfileRepository for FakeDb {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProfileEntity>, error::SystemError> {
        Ok(self.profiles.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<ProfileEntity>, error::SystemError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn find_by_friend_code(
        &self,
        code: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let code = code.to_uppercase();
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.friend_code == code)
            .cloned())
    }

    async fn insert(
        &self,
        profile: &InsertProfile,
    ) -> Result<ProfileEntity, error::SystemError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(error::SystemError::conflict("Id already exists"));
        }
        if profiles.iter().any(|p| p.friend_code == profile.friend_code) {
            return Err(error::SystemError::conflict("Code already exists"));
        }

        let created = ProfileEntity {
            id: profile.id.clone(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            friend_code: profile.friend_code.clone(),
            created_at: chrono::Utc::now(),
        };
        profiles.push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        update: &UpdateProfileModel,
    ) -> Result<ProfileEntity, error::SystemError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| error::SystemError::not_found("Profile not found"))?;

        if let Some(username) = &update.username {
            profile.username = Some(username.clone());
        }
        if let Some(display_name) = &update.display_name {
            profile.display_name = Some(display_name.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            profile.avatar_url = Some(avatar_url.clone());
        }
        Ok(profile.clone())
    }
}

#[async_trait::async_trait]
impl FollowRepository for FakeDb {
    async fn upsert_mutual_follow(&self, a: &str, b: &str) -> Result<(), error::SystemError> {
        let mut follows = self.follows.lock().unwrap();
        for (from, to) in [(a, b), (b, a)] {
            if !follows.iter().any(|(f, t)| f == from && t == to) {
                follows.push((from.to_string(), to.to_string()));
            }
        }
        Ok(())
    }

    async fn find_friend_ids(&self, user_id: &str) -> Result<Vec<String>, error::SystemError> {
        let follows = self.follows.lock().unwrap();
        Ok(follows
            .iter()
            .filter(|(from, to)| {
                from == user_id && follows.iter().any(|(f, t)| f == to && t == from)
            })
            .map(|(_, to)| to.clone())
            .collect())
    }
}

#[async_trait::async_trait]
impl FriendRequestRepository for FakeDb {
    async fn find_between(
        &self,
        a: &str,
        b: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                (r.requester_id == a && r.target_id == b)
                    || (r.requester_id == b && r.target_id == a)
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<FriendRequestEntity>, error::SystemError> {
        Ok(self.requests.lock().unwrap().iter().find(|r| r.id == *id).cloned())
    }

    async fn insert(
        &self,
        requester_id: &str,
        target_id: &str,
    ) -> Result<FriendRequestEntity, error::SystemError> {
        let request = FriendRequestEntity {
            id: new_id(),
            requester_id: requester_id.to_string(),
            target_id: target_id.to_string(),
            status: FriendRequestStatus::Pending,
            created_at: chrono::Utc::now(),
        };
        self.requests.lock().unwrap().push(request.clone());
        Ok(request)
    }

    async fn set_status(
        &self,
        id: &Uuid,
        status: FriendRequestStatus,
    ) -> Result<(), error::SystemError> {
        let mut requests = self.requests.lock().unwrap();
        if let Some(request) = requests.iter_mut().find(|r| r.id == *id) {
            request.status = status;
        }
        Ok(())
    }

    async fn list_pending_for(
        &self,
        target_id: &str,
    ) -> Result<Vec<FriendRequestEntity>, error::SystemError> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.target_id == target_id && r.status == FriendRequestStatus::Pending)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl RankingRepository for FakeDb {
    async fn insert(
        &self,
        ranking: &InsertRanking,
    ) -> Result<RankingEntity, error::SystemError> {
        let now = chrono::Utc::now();
        let created = RankingEntity {
            id: new_id(),
            user_id: ranking.user_id.clone(),
            title: ranking.title.clone(),
            description: ranking.description.clone(),
            ranking_type: ranking.ranking_type,
            visibility: ranking.visibility,
            source_type: ranking.source_type,
            source_id: ranking.source_id.clone(),
            source_variant: ranking.source_variant,
            pool_item_ids: ranking.pool_item_ids.clone(),
            created_at: now,
            updated_at: now,
        };
        self.rankings.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        id: &Uuid,
        owner_id: &str,
        update: &UpdateRanking,
    ) -> Result<Option<RankingEntity>, error::SystemError> {
        let mut rankings = self.rankings.lock().unwrap();
        let Some(ranking) =
            rankings.iter_mut().find(|r| r.id == *id && r.user_id == owner_id)
        else {
            return Ok(None);
        };

        ranking.title = update.title.clone();
        ranking.description = update.description.clone();
        ranking.ranking_type = update.ranking_type;
        ranking.visibility = update.visibility;
        ranking.source_type = update.source_type;
        ranking.source_id = update.source_id.clone();
        ranking.source_variant = update.source_variant;
        ranking.pool_item_ids = update.pool_item_ids.clone();
        ranking.updated_at = chrono::Utc::now();
        Ok(Some(ranking.clone()))
    }

    async fn delete(&self, id: &Uuid, owner_id: &str) -> Result<bool, error::SystemError> {
        let mut rankings = self.rankings.lock().unwrap();
        let before = rankings.len();
        rankings.retain(|r| !(r.id == *id && r.user_id == owner_id));
        let deleted = rankings.len() < before;

        if deleted {
            self.items.lock().unwrap().retain(|i| i.ranking_id != *id);
            self.likes.lock().unwrap().retain(|(rid, _)| rid != id);
        }
        Ok(deleted)
    }

    async fn set_visibility(
        &self,
        id: &Uuid,
        owner_id: &str,
        visibility: Visibility,
    ) -> Result<bool, error::SystemError> {
        let mut rankings = self.rankings.lock().unwrap();
        match rankings.iter_mut().find(|r| r.id == *id && r.user_id == owner_id) {
            Some(ranking) => {
                ranking.visibility = visibility;
                ranking.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(
        &self,
        id: &Uuid,
    ) -> Result<Option<RankingEntity>, error::SystemError> {
        Ok(self.find_by_ranking_id(id))
    }

    async fn max_source_variant(
        &self,
        owner_id: &str,
        source_type: SourceType,
        source_id: &str,
    ) -> Result<i32, error::SystemError> {
        Ok(self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.user_id == owner_id
                    && r.source_type == Some(source_type)
                    && r.source_id.as_deref() == Some(source_id)
            })
            .filter_map(|r| r.source_variant)
            .max()
            .unwrap_or(0))
    }

    async fn replace_items(
        &self,
        ranking_id: &Uuid,
        items: &[NewRankingItem],
    ) -> Result<(), error::SystemError> {
        let mut stored = self.items.lock().unwrap();
        stored.retain(|i| i.ranking_id != *ranking_id);
        for item in items {
            stored.push(RankingItemEntity {
                ranking_id: *ranking_id,
                item_id: item.item_id.clone(),
                position: item.position,
                notes: item.notes.clone(),
            });
        }
        Ok(())
    }

    async fn find_items(
        &self,
        ranking_id: &Uuid,
    ) -> Result<Vec<RankingItemEntity>, error::SystemError> {
        let mut items: Vec<RankingItemEntity> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.ranking_id == *ranking_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.position);
        Ok(items)
    }

    async fn list_for_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings: Vec<RankingEntity> = self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == owner_id)
            .cloned()
            .collect();
        Ok(self.summaries_newest_first(rankings))
    }

    async fn list_public(&self, limit: i64) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings: Vec<RankingEntity> = self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.visibility == Visibility::Public)
            .cloned()
            .collect();
        let mut summaries = self.summaries_newest_first(rankings);
        summaries.truncate(limit as usize);
        Ok(summaries)
    }

    async fn list_for_friends(
        &self,
        owner_ids: &[String],
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings: Vec<RankingEntity> = self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                owner_ids.contains(&r.user_id) && r.visibility != Visibility::Private
            })
            .cloned()
            .collect();
        Ok(self.summaries_newest_first(rankings))
    }

    async fn list_fixed_pool_for_owners(
        &self,
        owner_ids: &[String],
        source_type: SourceType,
        source_id: &str,
    ) -> Result<Vec<RankingSummary>, error::SystemError> {
        let rankings: Vec<RankingEntity> = self
            .rankings
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                owner_ids.contains(&r.user_id)
                    && r.visibility != Visibility::Private
                    && r.source_type == Some(source_type)
                    && r.source_id.as_deref() == Some(source_id)
            })
            .cloned()
            .collect();
        Ok(self.summaries_newest_first(rankings))
    }

    async fn insert_like(
        &self,
        ranking_id: &Uuid,
        user_id: &str,
    ) -> Result<bool, error::SystemError> {
        let mut likes = self.likes.lock().unwrap();
        if likes.iter().any(|(rid, uid)| rid == ranking_id && uid == user_id) {
            return Ok(false);
        }
        likes.push((*ranking_id, user_id.to_string()));
        Ok(true)
    }

    async fn delete_like(
        &self,
        ranking_id: &Uuid,
        user_id: &str,
    ) -> Result<(), error::SystemError> {
        self.likes
            .lock()
            .unwrap()
            .retain(|(rid, uid)| !(rid == ranking_id && uid == user_id));
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogRepository for FakeDb {
    async fn upsert_batch(&self, batch: &CatalogBatch) -> Result<(), error::SystemError> {
        {
            let mut artists = self.artists.lock().unwrap();
            for artist in &batch.artists {
                artists.retain(|a| a.id != artist.id);
                artists.push(artist.clone());
            }
        }
        {
            let mut albums = self.albums.lock().unwrap();
            for album in &batch.albums {
                albums.retain(|a| a.id != album.id);
                albums.push(album.clone());
            }
        }
        let mut tracks = self.tracks.lock().unwrap();
        for track in &batch.tracks {
            tracks.retain(|t| t.id != track.id);
            tracks.push(track.clone());
        }
        Ok(())
    }

    async fn find_artists(
        &self,
        ids: &[String],
    ) -> Result<Vec<ArtistEntity>, error::SystemError> {
        Ok(self
            .artists
            .lock()
            .unwrap()
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn find_albums(
        &self,
        ids: &[String],
    ) -> Result<Vec<AlbumEntity>, error::SystemError> {
        Ok(self
            .albums
            .lock()
            .unwrap()
            .iter()
            .filter(|a| ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn find_tracks(
        &self,
        ids: &[String],
    ) -> Result<Vec<TrackEntity>, error::SystemError> {
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl NotificationRepository for FakeDb {
    async fn insert(
        &self,
        user_id: &str,
        kind: NotificationType,
        data: serde_json::Value,
    ) -> Result<NotificationEntity, error::SystemError> {
        let notification = NotificationEntity {
            id: new_id(),
            user_id: user_id.to_string(),
            kind,
            data,
            is_read: false,
            created_at: chrono::Utc::now(),
        };
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(notification)
    }

    async fn list(
        &self,
        user_id: &str,
        limit: i64,
        unread_only: bool,
    ) -> Result<Vec<NotificationEntity>, error::SystemError> {
        Ok(self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn mark_read(&self, user_id: &str, ids: &[Uuid]) -> Result<u64, error::SystemError> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut flipped = 0;
        for notification in notifications.iter_mut() {
            if notification.user_id == user_id && ids.contains(&notification.id) {
                notification.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<u64, error::SystemError> {
        let mut notifications = self.notifications.lock().unwrap();
        let mut flipped = 0;
        for notification in notifications.iter_mut() {
            if notification.user_id == user_id && !notification.is_read {
                notification.is_read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn mark_friend_request_read(
        &self,
        user_id: &str,
        request_id: &Uuid,
    ) -> Result<(), error::SystemError> {
        let key = serde_json::json!(request_id);
        let mut notifications = self.notifications.lock().unwrap();
        for notification in notifications.iter_mut() {
            if notification.user_id == user_id
                && notification.data.get("friend_request_id") == Some(&key)
            {
                notification.is_read = true;
            }
        }
        Ok(())
    }
}

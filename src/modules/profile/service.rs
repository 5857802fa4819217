use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::configs::RedisCache;
use crate::modules::profile::model::{InsertProfile, ProfileResponse, UpdateProfileModel};
use crate::modules::profile::repository::ProfileRepository;
use crate::modules::profile::schema::ProfileEntity;
use crate::utils::generate_friend_code;

const FRIEND_CODE_RETRIES: usize = 5;

/// Create-if-absent lookup used on first ranking save and by `/profile/me`.
/// A conflict means either a concurrent create of the same profile or a
/// friend-code collision; both are resolved by re-reading or re-rolling.
pub async fn ensure_profile<P>(
    repo: &P,
    user_id: &str,
) -> Result<ProfileEntity, error::SystemError>
where
    P: ProfileRepository + Send + Sync + ?Sized,
{
    if let Some(profile) = repo.find_by_id(user_id).await? {
        return Ok(profile);
    }

    for _ in 0..FRIEND_CODE_RETRIES {
        let insert = InsertProfile {
            id: user_id.to_string(),
            username: None,
            display_name: None,
            avatar_url: None,
            friend_code: generate_friend_code(),
        };

        match repo.insert(&insert).await {
            Ok(profile) => {
                info!("Created profile for user {}", user_id);
                return Ok(profile);
            }
            Err(e) if e.is_conflict() => {
                if let Some(existing) = repo.find_by_id(user_id).await? {
                    return Ok(existing);
                }
                // Friend code collision: retry with a new code.
            }
            Err(e) => return Err(e),
        }
    }

    Err(error::SystemError::conflict("Could not allocate a unique friend code"))
}

#[derive(Clone)]
pub struct ProfileService {
    repo: Arc<dyn ProfileRepository + Send + Sync>,
    cache: Arc<RedisCache>,
}

impl ProfileService {
    pub fn with_dependencies(
        repo: Arc<dyn ProfileRepository + Send + Sync>,
        cache: Arc<RedisCache>,
    ) -> Self {
        info!("ProfileService initialized with dependencies");
        ProfileService { repo, cache }
    }

    pub async fn me(&self, user_id: &str) -> Result<ProfileResponse, error::SystemError> {
        let key = format!("profile:{}", user_id);
        if let Some(cached) = self.cache.get::<ProfileResponse>(&key).await? {
            info!("Profile {} found in cache", user_id);
            return Ok(cached);
        }

        let profile = ensure_profile(&*self.repo, user_id).await?;
        let response = ProfileResponse::from(profile);
        self.cache.set(&key, &response, 3600).await?;
        Ok(response)
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        update: UpdateProfileModel,
    ) -> Result<ProfileResponse, error::SystemError> {
        if update.username.is_none()
            && update.display_name.is_none()
            && update.avatar_url.is_none()
        {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let profile = self.repo.update(user_id, &update).await?;

        let key = format!("profile:{}", user_id);
        self.cache.delete(&key).await?;

        Ok(ProfileResponse::from(profile))
    }
}

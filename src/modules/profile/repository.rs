use crate::api::error;
use crate::modules::profile::model::{InsertProfile, UpdateProfileModel};
use crate::modules::profile::schema::ProfileEntity;

#[async_trait::async_trait]
pub trait ProfileRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProfileEntity>, error::SystemError>;

    async fn find_by_ids(&self, ids: &[String])
    -> Result<Vec<ProfileEntity>, error::SystemError>;

    /// Friend-code lookup is case-insensitive; callers uppercase the input.
    async fn find_by_friend_code(
        &self,
        code: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError>;

    async fn insert(&self, profile: &InsertProfile)
    -> Result<ProfileEntity, error::SystemError>;

    async fn update(
        &self,
        id: &str,
        update: &UpdateProfileModel,
    ) -> Result<ProfileEntity, error::SystemError>;
}

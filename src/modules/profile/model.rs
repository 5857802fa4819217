use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::modules::profile::schema::ProfileEntity;

pub struct InsertProfile {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub friend_code: String,
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileModel {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "Display name cannot be empty"))]
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub friend_code: String,
}

impl From<ProfileEntity> for ProfileResponse {
    fn from(entity: ProfileEntity) -> Self {
        ProfileResponse {
            id: entity.id,
            username: entity.username,
            display_name: entity.display_name,
            avatar_url: entity.avatar_url,
            friend_code: entity.friend_code,
        }
    }
}

impl ProfileEntity {
    /// Best available name for user-facing messages.
    pub fn visible_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or(self.id.as_str())
    }
}

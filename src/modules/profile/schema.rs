use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

/// One row per authenticated user, keyed by the identity provider's subject
/// id. Created lazily on first ranking save; never deleted here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileEntity {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub friend_code: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

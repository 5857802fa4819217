use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct ListNotificationsQuery {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    pub unread_only: Option<bool>,
}

pub const DEFAULT_LIST_LIMIT: i64 = 20;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MarkReadBody {
    pub notification_ids: Option<Vec<Uuid>>,
    pub mark_all_read: Option<bool>,
}

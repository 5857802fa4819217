use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::modules::ranking::schema::SourceType;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendRequestBody {
    #[validate(length(equal = 8, message = "Friend code must be 8 characters"))]
    pub friend_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RespondAction {
    Accept,
    Decline,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RespondBody {
    pub request_id: Uuid,
    pub action: RespondAction,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentRequest {
    pub request_id: Uuid,
}

/// Incoming pending request annotated with the requester's display fields,
/// enough for an accept/decline list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestView {
    pub id: Uuid,
    pub requester_id: String,
    pub requester_name: String,
    pub requester_avatar_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FriendsRankingsQuery {
    pub source_type: SourceType,
    #[validate(length(min = 1, message = "sourceId is required"))]
    pub source_id: String,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::UserSummary;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "friend_request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
}

#[derive(Debug, FromRow)]
pub struct FriendRequestRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: RequestStatus,
}

// joined request + counterpart profile, flattened for `query_as`
#[derive(Debug, FromRow)]
pub struct RequestWithProfileRow {
    pub request_id: Uuid,
    pub id: Uuid,
    pub full_name: String,
    pub profile_picture_url: String,
    pub native_language: String,
    pub learning_language: String,
}

impl RequestWithProfileRow {
    pub fn into_profile(self) -> (Uuid, UserSummary) {
        (
            self.request_id,
            UserSummary {
                id: self.id,
                full_name: self.full_name,
                profile_picture_url: self.profile_picture_url,
                native_language: self.native_language,
                learning_language: self.learning_language,
            },
        )
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct IncomingRequest {
    pub id: Uuid,
    pub sender: UserSummary,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SentRequest {
    pub id: Uuid,
    pub receiver: UserSummary,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendRequests {
    pub incoming_reqs: Vec<IncomingRequest>,
    pub accepted_reqs: Vec<SentRequest>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct FriendList {
    pub friends: Vec<UserSummary>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RecommendedUsers {
    pub users: Vec<UserSummary>,
}

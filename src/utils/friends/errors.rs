use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FriendError {
    #[error("Cannot send a friend request to yourself")]
    SelfReference,
    #[error("Recipient not found")]
    RecipientNotFound,
    #[error("Already friends")]
    AlreadyFriends,
    #[error("Friend request already exists")]
    RequestAlreadyExists,
    #[error("Friend request not found")]
    RequestNotFound,
    #[error("Only the recipient can accept a friend request")]
    NotRequestRecipient,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl IntoResponse for FriendError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match &self {
            FriendError::SelfReference => StatusCode::BAD_REQUEST,
            FriendError::RecipientNotFound => StatusCode::NOT_FOUND,
            FriendError::AlreadyFriends => StatusCode::BAD_REQUEST,
            FriendError::RequestAlreadyExists => StatusCode::BAD_REQUEST,
            FriendError::RequestNotFound => StatusCode::NOT_FOUND,
            FriendError::NotRequestRecipient => StatusCode::FORBIDDEN,
            FriendError::Unexpected(e) => {
                tracing::error!("Internal server error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let info = match self {
            FriendError::Unexpected(_) => "Unexpected server error".into(),
            _ => self.to_string(),
        };

        (status_code, Json(json!({ "error_info": info }))).into_response()
    }
}

impl From<sqlx::Error> for FriendError {
    fn from(e: sqlx::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(e))
    }
}

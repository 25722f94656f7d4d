use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::app_errors::AppError;
use crate::models::Claims;
use crate::utils::friends::models::{FriendList, FriendRequests, RecommendedUsers, SentRequest};
use crate::utils::friends::{
    accept_friend_request, fetch_accepted_sent_requests, fetch_incoming_requests,
    fetch_outgoing_requests, fetch_recommended_users, fetch_user_friends, send_friend_request,
};

pub fn router() -> Router {
    Router::new()
        .route("/", get(recommended_users))
        .route("/friends", get(user_friends))
        .route("/friend-request/:id", post(post_send_friend_request))
        .route("/friend-request/:id/accept", put(put_accept_friend_request))
        .route("/friend-requests", get(friend_requests))
        .route("/outgoing-friend-requests", get(outgoing_friend_requests))
}

async fn recommended_users(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
) -> Result<Json<RecommendedUsers>, AppError> {
    let users = fetch_recommended_users(&pool, claims.user_id).await?;
    Ok(Json(RecommendedUsers { users }))
}

async fn user_friends(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
) -> Result<Json<FriendList>, AppError> {
    let friends = fetch_user_friends(&pool, claims.user_id).await?;
    Ok(Json(FriendList { friends }))
}

async fn post_send_friend_request(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
    Path(receiver_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    send_friend_request(&pool, claims.user_id, receiver_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "info": "Friend request sent" })),
    ))
}

async fn put_accept_friend_request(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    accept_friend_request(&pool, request_id, claims.user_id).await?;
    Ok(Json(json!({ "info": "Friend request accepted" })))
}

async fn friend_requests(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
) -> Result<Json<FriendRequests>, AppError> {
    let incoming_reqs = fetch_incoming_requests(&pool, claims.user_id).await?;
    let accepted_reqs = fetch_accepted_sent_requests(&pool, claims.user_id).await?;
    Ok(Json(FriendRequests {
        incoming_reqs,
        accepted_reqs,
    }))
}

async fn outgoing_friend_requests(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
) -> Result<Json<Vec<SentRequest>>, AppError> {
    let requests = fetch_outgoing_requests(&pool, claims.user_id).await?;
    Ok(Json(requests))
}


#[allow(dead_code)]
fn _assert_handler_send() {
    fn is_send<T: Send>(_: T) {}
    let pool: PgPool = unimplemented!();
    let claims: Claims = unimplemented!();
    let receiver_id = Uuid::nil();
    is_send(async move {
        send_friend_request(&pool, claims.user_id, receiver_id).await?;
        Ok::<_, AppError>((StatusCode::CREATED, Json(json!({ "info": "x" }))))
    });
}

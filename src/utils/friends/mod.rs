pub mod errors;
pub mod models;

use anyhow::Context;
use sqlx::{query, query_as, Acquire, Postgres};
use tracing::debug;
use uuid::Uuid;

use self::errors::FriendError;
use self::models::{
    FriendRequestRow, IncomingRequest, RequestStatus, RequestWithProfileRow, SentRequest,
};
use crate::models::UserSummary;

pub async fn send_friend_request<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<(), FriendError> {
    if sender_id == receiver_id {
        return Err(FriendError::SelfReference);
    }

    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    //? does the recipient exist
    let recipient = query(
        r#"
            select id from users
            where id = $1
        "#,
    )
    .bind(receiver_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select the recipient")?;

    if recipient.is_none() {
        return Err(FriendError::RecipientNotFound);
    }

    //? is a friend already
    if is_friend(&mut transaction, sender_id, receiver_id).await? {
        return Err(FriendError::AlreadyFriends);
    }

    //? is a request pending in either direction
    let res = query(
        r#"
            select id from friend_requests
            where (sender_id = $1 and receiver_id = $2)
               or (sender_id = $2 and receiver_id = $1)
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to select friend request")?;

    if res.is_some() {
        return Err(FriendError::RequestAlreadyExists);
    }

    let res = query(
        r#"
            insert into friend_requests (sender_id, receiver_id)
            values ($1, $2)
        "#,
    )
    .bind(sender_id)
    .bind(receiver_id)
    .execute(&mut transaction)
    .await;

    // the pair index catches concurrent duplicates the select above can miss
    if let Err(e) = res {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.constraint() == Some("friend_requests_pair_idx") {
                return Err(FriendError::RequestAlreadyExists);
            }
        }
        return Err(FriendError::Unexpected(e.into()));
    }

    transaction.commit().await.context("Transaction failed")?;

    Ok(())
}

pub async fn accept_friend_request<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    request_id: Uuid,
    user_id: Uuid,
) -> Result<(), FriendError> {
    let mut transaction = conn.begin().await.context("Failed to begin transaction")?;

    let request = query_as::<_, FriendRequestRow>(
        r#"
            select id, sender_id, receiver_id, status from friend_requests
            where id = $1
        "#,
    )
    .bind(request_id)
    .fetch_optional(&mut transaction)
    .await
    .context("Failed to fetch friend request")?
    .ok_or(FriendError::RequestNotFound)?;

    if request.receiver_id != user_id {
        return Err(FriendError::NotRequestRecipient);
    }

    if request.status == RequestStatus::Accepted {
        debug!("Friend request {} accepted twice", request.id);
        return Ok(());
    }

    query(
        r#"
            update friend_requests
            set status = 'accepted'
            where id = $1 and status = 'pending'
        "#,
    )
    .bind(request.id)
    .execute(&mut transaction)
    .await
    .context("Failed to accept friend request")?;

    // both directions in the same transaction as the status change
    let res = query(
        r#"
            insert into user_friends (user_id, friend_id)
            values ($1, $2), ($2, $1)
            on conflict do nothing
        "#,
    )
    .bind(request.sender_id)
    .bind(request.receiver_id)
    .execute(&mut transaction)
    .await;

    if let Err(e) = res {
        transaction
            .rollback()
            .await
            .context("Failed to abort transaction")?;
        return Err(FriendError::Unexpected(e.into()));
    }

    transaction.commit().await.context("Transaction failed")?;

    Ok(())
}

pub async fn fetch_incoming_requests<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<IncomingRequest>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let rows = query_as::<_, RequestWithProfileRow>(
        r#"
            select fr.id as request_id, u.id, u.full_name, u.profile_picture_url,
                   u.native_language, u.learning_language
            from friend_requests fr
            join users u on u.id = fr.sender_id
            where fr.receiver_id = $1 and fr.status = 'pending'
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch incoming friend requests")?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let (id, sender) = row.into_profile();
            IncomingRequest { id, sender }
        })
        .collect())
}

pub async fn fetch_outgoing_requests<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<SentRequest>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let rows = query_as::<_, RequestWithProfileRow>(
        r#"
            select fr.id as request_id, u.id, u.full_name, u.profile_picture_url,
                   u.native_language, u.learning_language
            from friend_requests fr
            join users u on u.id = fr.receiver_id
            where fr.sender_id = $1 and fr.status = 'pending'
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch outgoing friend requests")?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let (id, receiver) = row.into_profile();
            SentRequest { id, receiver }
        })
        .collect())
}

pub async fn fetch_accepted_sent_requests<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<SentRequest>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let rows = query_as::<_, RequestWithProfileRow>(
        r#"
            select fr.id as request_id, u.id, u.full_name, u.profile_picture_url,
                   u.native_language, u.learning_language
            from friend_requests fr
            join users u on u.id = fr.receiver_id
            where fr.sender_id = $1 and fr.status = 'accepted'
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch accepted friend requests")?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let (id, receiver) = row.into_profile();
            SentRequest { id, receiver }
        })
        .collect())
}

pub async fn fetch_user_friends<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let friends = query_as::<_, UserSummary>(
        r#"
            select u.id, u.full_name, u.profile_picture_url,
                   u.native_language, u.learning_language
            from user_friends uf
            join users u on u.id = uf.friend_id
            where uf.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch friends")?;

    Ok(friends)
}

pub async fn fetch_recommended_users<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
) -> Result<Vec<UserSummary>, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let users = query_as::<_, UserSummary>(
        r#"
            select u.id, u.full_name, u.profile_picture_url,
                   u.native_language, u.learning_language
            from users u
            where u.id <> $1
              and u.is_onboarded
              and not exists (
                  select 1 from user_friends uf
                  where uf.user_id = $1 and uf.friend_id = u.id
              )
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await
    .context("Failed to fetch recommended users")?;

    Ok(users)
}

pub async fn is_friend<'c>(
    conn: impl Acquire<'c, Database = Postgres>,
    user_id: Uuid,
    friend_id: Uuid,
) -> Result<bool, FriendError> {
    let mut conn = conn.acquire().await.context("Failed to acquire")?;

    let res = query(
        r#"
            select user_id from user_friends
            where user_id = $1 and friend_id = $2
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .fetch_optional(&mut *conn)
    .await
    .context("Failed to select user friend")?;

    Ok(res.is_some())
}


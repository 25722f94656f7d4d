
use backend::utils::friends::errors::FriendError;
use backend::utils::friends::{
    accept_friend_request, fetch_accepted_sent_requests, fetch_incoming_requests,
    fetch_outgoing_requests, fetch_recommended_users, fetch_user_friends, send_friend_request,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::net::SocketAddr;
use uuid::Uuid;

fn aiko() -> Uuid {
    Uuid::parse_str("0b8f1e6a-53d6-4dcf-9a77-4b1e0d2f5a01").unwrap()
}

fn marco() -> Uuid {
    Uuid::parse_str("7a1c2ff0-9f2e-4d86-b7cd-0d5e9f3b6c02").unwrap()
}

fn lena() -> Uuid {
    Uuid::parse_str("c4e0a9d2-6b31-44f8-8a59-2e7f1c8d9e03").unwrap()
}

fn tomas() -> Uuid {
    Uuid::parse_str("f2d3b4a5-1c6e-47f0-9b88-3a4e5d6f7a04").unwrap()
}

// pending request from Marco to Aiko, seeded by the friend_requests fixture
fn pending_request() -> Uuid {
    Uuid::parse_str("9d2f5c88-1a7e-4b43-a2d6-5f0e8c7b1d10").unwrap()
}

#[sqlx::test(fixtures("users"))]
async fn send_request(db: PgPool) {
    send_friend_request(&db, aiko(), marco()).await.unwrap();

    let outgoing = fetch_outgoing_requests(&db, aiko()).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].receiver.id, marco());

    let incoming = fetch_incoming_requests(&db, marco()).await.unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].sender.id, aiko());
}

#[sqlx::test(fixtures("users"))]
async fn send_request_twice(db: PgPool) {
    send_friend_request(&db, aiko(), marco()).await.unwrap();
    let res = send_friend_request(&db, aiko(), marco()).await;

    match res {
        Err(FriendError::RequestAlreadyExists) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn send_request_opposite_direction(db: PgPool) {
    send_friend_request(&db, aiko(), marco()).await.unwrap();
    let res = send_friend_request(&db, marco(), aiko()).await;

    match res {
        Err(FriendError::RequestAlreadyExists) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn send_request_to_self(db: PgPool) {
    let res = send_friend_request(&db, aiko(), aiko()).await;

    match res {
        Err(FriendError::SelfReference) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users"))]
async fn send_request_unknown_recipient(db: PgPool) {
    let res = send_friend_request(&db, aiko(), Uuid::new_v4()).await;

    match res {
        Err(FriendError::RecipientNotFound) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friends"))]
async fn send_request_when_already_friends(db: PgPool) {
    let res = send_friend_request(&db, aiko(), lena()).await;

    match res {
        Err(FriendError::AlreadyFriends) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_request(db: PgPool) {
    accept_friend_request(&db, pending_request(), aiko())
        .await
        .unwrap();

    // both directions materialized
    let friends = fetch_user_friends(&db, aiko()).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, marco());

    let friends = fetch_user_friends(&db, marco()).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, aiko());

    // the request left both pending lists
    assert!(fetch_incoming_requests(&db, aiko()).await.unwrap().is_empty());
    assert!(fetch_outgoing_requests(&db, marco()).await.unwrap().is_empty());

    let accepted = fetch_accepted_sent_requests(&db, marco()).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].receiver.id, aiko());
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_request_not_recipient(db: PgPool) {
    let res = accept_friend_request(&db, pending_request(), lena()).await;

    match res {
        Err(FriendError::NotRequestRecipient) => (),
        _ => panic!("Test gives the result {:?}", res),
    }

    // nothing changed
    assert!(fetch_user_friends(&db, aiko()).await.unwrap().is_empty());
    assert_eq!(fetch_incoming_requests(&db, aiko()).await.unwrap().len(), 1);
}

#[sqlx::test(fixtures("users"))]
async fn accept_request_missing(db: PgPool) {
    let res = accept_friend_request(&db, Uuid::new_v4(), aiko()).await;

    match res {
        Err(FriendError::RequestNotFound) => (),
        _ => panic!("Test gives the result {:?}", res),
    }
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_request_twice(db: PgPool) {
    accept_friend_request(&db, pending_request(), aiko())
        .await
        .unwrap();
    accept_friend_request(&db, pending_request(), aiko())
        .await
        .unwrap();

    let friends = fetch_user_friends(&db, aiko()).await.unwrap();
    assert_eq!(friends.len(), 1);
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn incoming_requests(db: PgPool) {
    let incoming = fetch_incoming_requests(&db, aiko()).await.unwrap();

    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0].id, pending_request());
    assert_eq!(incoming[0].sender.id, marco());
    assert_eq!(incoming[0].sender.full_name, "Marco Rossi");
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn outgoing_requests(db: PgPool) {
    let outgoing = fetch_outgoing_requests(&db, marco()).await.unwrap();
    assert_eq!(outgoing.len(), 1);
    assert_eq!(outgoing[0].receiver.id, aiko());

    // Aiko's only sent request is accepted, not pending
    assert!(fetch_outgoing_requests(&db, aiko()).await.unwrap().is_empty());
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accepted_sent_requests(db: PgPool) {
    let accepted = fetch_accepted_sent_requests(&db, aiko()).await.unwrap();

    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].receiver.id, lena());
}

#[sqlx::test(fixtures("users", "friends"))]
async fn fetch_all_friends(db: PgPool) {
    let friends = fetch_user_friends(&db, aiko()).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, lena());

    let friends = fetch_user_friends(&db, lena()).await.unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].id, aiko());
}

#[sqlx::test(fixtures("users", "friends"))]
async fn recommended_users(db: PgPool) {
    // Lena is a friend, Tomas never finished onboarding
    let users = fetch_recommended_users(&db, aiko()).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, marco());

    let users = fetch_recommended_users(&db, marco()).await.unwrap();
    let ids: Vec<Uuid> = users.iter().map(|user| user.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&aiko()));
    assert!(ids.contains(&lena()));
    assert!(!ids.contains(&marco()));
    assert!(!ids.contains(&tomas()));
}

async fn register_and_onboard(
    client: &Client,
    addr: SocketAddr,
    email: &str,
    full_name: &str,
    native_language: &str,
    learning_language: &str,
) -> Uuid {
    let res = client
        .post(format!("http://{addr}/auth/register"))
        .json(&json!({
            "email": email,
            "password": "#very#_#strong#_#pass#",
            "full_name": full_name
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    let user_id = Uuid::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();

    let res = client
        .post(format!("http://{addr}/auth/onboarding"))
        .json(&json!({
            "full_name": full_name,
            "bio": "here to trade languages",
            "native_language": native_language,
            "learning_language": learning_language,
            "location": "Lyon, France"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    user_id
}

#[sqlx::test]
async fn friendship_integration_test(db: PgPool) {
    let app_data = tools::AppData::new(db).await;
    let addr = app_data.addr;

    // separate cookie stores, one per user
    let alice = app_data.client();
    let bob = app_data.client();

    let alice_id =
        register_and_onboard(&alice, addr, "alice@example.com", "Alice Martin", "french", "korean")
            .await;
    let bob_id =
        register_and_onboard(&bob, addr, "bob@example.com", "Bob Choi", "korean", "french").await;

    // Alice discovers Bob through recommendations
    let res = alice
        .get(format!("http://{addr}/api/users"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert!(body["users"]
        .as_array()
        .unwrap()
        .iter()
        .any(|user| user["id"] == json!(bob_id)));

    let res = alice
        .post(format!("http://{addr}/api/users/friend-request/{bob_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // repeated send is rejected
    let res = alice
        .post(format!("http://{addr}/api/users/friend-request/{bob_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Bob sees the pending request
    let res = bob
        .get(format!("http://{addr}/api/users/friend-requests"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    let incoming = body["incoming_reqs"].as_array().unwrap();
    assert_eq!(incoming.len(), 1);
    assert_eq!(incoming[0]["sender"]["id"], json!(alice_id));
    let request_id = incoming[0]["id"].as_str().unwrap().to_string();

    let res = bob
        .put(format!(
            "http://{addr}/api/users/friend-request/{request_id}/accept"
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // both sides now list each other
    let res = alice
        .get(format!("http://{addr}/api/users/friends"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let friends = body["friends"].as_array().unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], json!(bob_id));

    let res = bob
        .get(format!("http://{addr}/api/users/friends"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    let friends = body["friends"].as_array().unwrap();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0]["id"], json!(alice_id));

    // friends no longer show up as recommendations
    let res = bob
        .get(format!("http://{addr}/api/users"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["users"]
        .as_array()
        .unwrap()
        .iter()
        .all(|user| user["id"] != json!(alice_id)));
}

#[sqlx::test(fixtures("users", "friend_requests"))]
async fn accept_integration_forbidden_for_non_recipient(db: PgPool) {
    let app_data = tools::AppData::new(db).await;
    let addr = app_data.addr;

    // Dana is neither sender nor recipient of the seeded request
    let dana = app_data.client();
    let res = dana
        .post(format!("http://{addr}/auth/register"))
        .json(&json!({
            "email": "dana@example.com",
            "password": "#very#_#strong#_#pass#",
            "full_name": "Dana Petrov"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = dana
        .put(format!(
            "http://{addr}/api/users/friend-request/{}/accept",
            pending_request()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

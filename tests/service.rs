use reqwest::StatusCode;

use sqlx::PgPool;

#[sqlx::test]
async fn health_check(db: PgPool) {
    let app_data = tools::AppData::new(db).await;

    let res = app_data
        .client()
        .get(format!("http://{}/health", app_data.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK)
}

#[sqlx::test]
async fn unknown_endpoint(db: PgPool) {
    let app_data = tools::AppData::new(db).await;

    let res = app_data
        .client()
        .get(format!("http://{}/definitely-not-an-endpoint", app_data.addr))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND)
}

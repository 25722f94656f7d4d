use crate::app_errors::AppError;
use crate::models::{Claims, LoginCredentials, OnboardingProfile, RegisterCredentials};
use crate::utils::auth::{
    add_token_to_blacklist, get_user_by_id, login_user, onboard_user, try_register_user,
    verify_user_credentials,
};
use crate::JwtSecret;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;
use secrecy::SecretString;
use serde_json::{json, Value};
use sqlx::PgPool;
use time::Duration;
use tracing::debug;

pub const JWT_TOKEN_EXPIRATION: Duration = Duration::days(7);

pub fn router() -> Router {
    Router::new()
        .route("/register", post(post_register_user))
        .route("/login", post(post_login_user))
        .route("/logout", post(post_user_logout))
        .route("/onboarding", post(post_onboard_user))
        .route("/me", get(get_logged_user))
}

async fn post_register_user(
    Extension(pool): Extension<PgPool>,
    Extension(JwtSecret(jwt_secret)): Extension<JwtSecret>,
    jar: CookieJar,
    Json(register_credentials): Json<RegisterCredentials>,
) -> Result<(StatusCode, CookieJar, Json<Value>), AppError> {
    let user_id = try_register_user(
        &pool,
        register_credentials.email.trim(),
        SecretString::new(register_credentials.password.trim().to_string()),
        &register_credentials.full_name,
    )
    .await?;

    let jar = login_user(user_id, &jwt_secret, jar)?;
    let user = get_user_by_id(&pool, user_id).await?;

    debug!("User {user_id} registered successfully");

    Ok((StatusCode::CREATED, jar, Json(json!({ "user": user }))))
}

async fn post_login_user(
    Extension(pool): Extension<PgPool>,
    Extension(JwtSecret(jwt_secret)): Extension<JwtSecret>,
    jar: CookieJar,
    Json(login_credentials): Json<LoginCredentials>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    // returns if credentials are wrong
    let user_id = verify_user_credentials(
        &pool,
        &login_credentials.email,
        SecretString::new(login_credentials.password.clone()),
    )
    .await?;

    let jar = login_user(user_id, &jwt_secret, jar)?;
    let user = get_user_by_id(&pool, user_id).await?;

    debug!("User {user_id} logged in successfully");

    Ok((jar, Json(json!({ "user": user }))))
}

async fn post_user_logout(
    Extension(pool): Extension<PgPool>,
    Extension(JwtSecret(jwt_secret)): Extension<JwtSecret>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AppError> {
    if let Some(cookie) = jar.get("jwt") {
        // the token stays valid until its expiry otherwise
        if let Ok(claims) = Claims::decode_jwt(cookie.value(), &jwt_secret) {
            add_token_to_blacklist(&pool, &claims).await?;
        }
    }

    debug!("User logged out successfully");

    Ok((
        jar.remove(remove_cookie("jwt")),
        Json(json!({ "info": "Logged out" })),
    ))
}

fn remove_cookie(name: &str) -> Cookie {
    Cookie::build(name, "")
        .path("/")
        .max_age(Duration::seconds(0))
        .finish()
}

async fn post_onboard_user(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
    Json(profile): Json<OnboardingProfile>,
) -> Result<Json<Value>, AppError> {
    let user = onboard_user(&pool, claims.user_id, profile).await?;

    debug!("User {} onboarded successfully", claims.user_id);

    Ok(Json(json!({ "user": user })))
}

async fn get_logged_user(
    claims: Claims,
    Extension(pool): Extension<PgPool>,
) -> Result<Json<Value>, AppError> {
    let user = get_user_by_id(&pool, claims.user_id).await?;
    Ok(Json(json!({ "user": user })))
}

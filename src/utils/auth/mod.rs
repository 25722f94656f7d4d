pub mod additions;
pub mod errors;

use crate::{
    models::{Claims, OnboardingProfile, RegisterCredentials, UserModel},
    routes::auth::JWT_TOKEN_EXPIRATION,
};
use anyhow::Context;
use argon2::verify_encoded;
use axum_extra::extract::CookieJar;
use errors::*;
use secrecy::{ExposeSecret, Secret, SecretString};
use sqlx::{query, query_as, query_scalar, PgPool, Row};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

pub async fn try_register_user(
    pool: &PgPool,
    email: &str,
    password: SecretString,
    full_name: &str,
) -> Result<Uuid, AuthError> {
    let email = email.trim();
    let full_name = full_name.trim();

    if email.is_empty() || password.expose_secret().trim().is_empty() || full_name.is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let _ = RegisterCredentials::new(email, password.expose_secret(), full_name).validate()?;

    let user = query(
        r#"
            select id from users where email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .context("Failed to query user by email")?;

    if user.is_some() {
        return Err(AuthError::UserAlreadyExists);
    }

    if !additions::pass_is_strong(password.expose_secret(), &[email, full_name]) {
        return Err(AuthError::WeakPassword);
    }

    let hashed_pass = additions::hash_pass(password).context("Failed to hash pass")?;

    let user_id = query_scalar::<_, Uuid>(
        r#"
            insert into users (email, password, full_name, profile_picture_url)
            values ($1, $2, $3, $4)
            returning id
        "#,
    )
    .bind(email)
    .bind(hashed_pass)
    .bind(full_name)
    .bind(additions::random_avatar_url())
    .fetch_one(pool)
    .await
    .context("Failed to create a new user")?;

    Ok(user_id)
}

pub async fn verify_user_credentials(
    pool: &PgPool,
    email: &str,
    password: SecretString,
) -> Result<Uuid, AuthError> {
    debug!("Verifying credentials");
    if email.trim().is_empty() || password.expose_secret().trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }

    let res = query(
        r#"
            select id, password from users where email = $1
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
    .context("Failed to select user by email")?
    .ok_or(AuthError::WrongEmailOrPassword)?;

    let hashed_pass: String = res.get("password");

    match verify_encoded(&hashed_pass, password.expose_secret().as_bytes())
        .context("Failed to verify password")?
    {
        true => Ok(res.get("id")),
        false => Err(AuthError::WrongEmailOrPassword),
    }
}

pub fn login_user(
    user_id: Uuid,
    jwt_secret: &Secret<String>,
    jar: CookieJar,
) -> Result<CookieJar, AuthError> {
    let claims = Claims::new(user_id, JWT_TOKEN_EXPIRATION);
    let token = claims.generate_jwt(jwt_secret)?;

    Ok(jar.add(Claims::generate_cookie(token)))
}

pub async fn onboard_user(
    pool: &PgPool,
    user_id: Uuid,
    profile: OnboardingProfile,
) -> Result<UserModel, AuthError> {
    let required = [
        &profile.full_name,
        &profile.bio,
        &profile.native_language,
        &profile.learning_language,
        &profile.location,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AuthError::MissingProfileField);
    }

    let user = query_as::<_, UserModel>(
        r#"
            update users
            set full_name = $2,
                bio = $3,
                native_language = $4,
                learning_language = $5,
                location = $6,
                profile_picture_url = coalesce($7, profile_picture_url),
                is_onboarded = true
            where id = $1
            returning id, email, full_name, bio, profile_picture_url,
                      native_language, learning_language, location, is_onboarded
        "#,
    )
    .bind(user_id)
    .bind(profile.full_name.trim())
    .bind(profile.bio.trim())
    .bind(profile.native_language.trim())
    .bind(profile.learning_language.trim())
    .bind(profile.location.trim())
    .bind(profile.profile_picture_url)
    .fetch_optional(pool)
    .await
    .context("Failed to onboard user")?
    .ok_or(AuthError::UserNotFound)?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<UserModel, AuthError> {
    let user = query_as::<_, UserModel>(
        r#"
            select id, email, full_name, bio, profile_picture_url,
                   native_language, learning_language, location, is_onboarded
            from users
            where id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("Failed to select user by id")?
    .ok_or(AuthError::UserNotFound)?;

    Ok(user)
}

pub async fn add_token_to_blacklist(pool: &PgPool, claims: &Claims) -> Result<(), AuthError> {
    let exp = OffsetDateTime::from_unix_timestamp(claims.exp as i64)
        .context("Failed to convert timestamp to date and time with the timezone")?;

    query(
        r#"
            insert into jwt_blacklist (token_id, expiry)
            values ($1, $2)
            on conflict do nothing
        "#,
    )
    .bind(claims.jti)
    .bind(exp)
    .execute(pool)
    .await
    .context("Failed to add token to the blacklist")?;

    Ok(())
}

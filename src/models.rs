use crate::{utils::auth::errors::AuthError, JwtSecret};
use anyhow::Context;
use axum::{
    async_trait,
    extract::{FromRequest, RequestParts},
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{query, FromRow, PgPool};
use time::Duration;
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub exp: u64,
}

impl Claims {
    pub fn new(user_id: Uuid, duration: Duration) -> Self {
        Self {
            jti: Uuid::new_v4(),
            user_id,
            exp: jsonwebtoken::get_current_timestamp() + duration.whole_seconds().unsigned_abs(),
        }
    }

    pub fn generate_jwt(&self, key: &Secret<String>) -> Result<String, AuthError> {
        Ok(encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(key.expose_secret().as_bytes()),
        )
        .context("Failed to encode the JWT")?)
    }

    pub fn generate_cookie<'a>(token: String) -> Cookie<'a> {
        Cookie::build(String::from("jwt"), token)
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .finish()
    }

    pub fn decode_jwt(token: &str, key: &Secret<String>) -> Result<Self, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 5;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(key.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|_e| AuthError::InvalidToken)?;

        Ok(data.claims)
    }

    pub async fn is_blacklisted(&self, pool: &PgPool) -> Result<bool, AuthError> {
        let res = query(
            r#"
                select token_id from jwt_blacklist
                where token_id = $1
            "#,
        )
        .bind(self.jti)
        .fetch_optional(pool)
        .await
        .context("Failed to verify token with the blacklist")?;

        Ok(res.is_some())
    }
}

#[async_trait]
impl<B> FromRequest<B> for Claims
where
    B: Send,
{
    type Rejection = AuthError;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let ext = req.extensions();

        let JwtSecret(jwt_key) = ext
            .get::<JwtSecret>()
            .expect("Failed to get jwt secret extension")
            .clone();

        let pool = ext
            .get::<PgPool>()
            .expect("Failed to get database pool extension")
            .clone();

        let jar = CookieJar::from_request(req)
            .await
            .context("Failed to fetch cookie jar")?;

        let cookie = jar.get("jwt").ok_or(AuthError::InvalidToken).cloned()?;
        let claims = Claims::decode_jwt(cookie.value(), &jwt_key)?;

        match claims.is_blacklisted(&pool).await? {
            true => Err(AuthError::InvalidToken),
            false => Ok(claims),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, FromRow)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub bio: String,
    pub profile_picture_url: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub is_onboarded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub full_name: String,
    pub profile_picture_url: String,
    pub native_language: String,
    pub learning_language: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct LoginCredentials {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RegisterCredentials {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 60, message = "Invalid full name length"))]
    pub full_name: String,
}

impl RegisterCredentials {
    pub fn new(email: &str, password: &str, full_name: &str) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OnboardingProfile {
    pub full_name: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub profile_picture_url: Option<String>,
}

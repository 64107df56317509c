use axum_extra::extract::CookieJar;
use chrono::Utc;
use color_eyre::eyre::{eyre, Context, ContextCompat, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthAPIError, Email, User, UserId};

use super::constants::{JWT_SECRET, SESSION_COOKIE_NAME};

// This value determines how long a session token is valid for
pub const TOKEN_TTL_SECONDS: i64 = 3600; // 1 hour

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

impl Claims {
    /// The signed-in account described by the token.
    pub fn user(&self) -> Result<User, AuthAPIError> {
        let id = UserId::parse(&self.sub).map_err(|_| AuthAPIError::InvalidToken)?;
        let email =
            Email::parse_str(&self.email).map_err(|_| AuthAPIError::InvalidToken)?;

        Ok(User {
            id,
            email,
            name: self.name.clone(),
            image: String::new(),
        })
    }
}

// Read and validate the session cookie
#[tracing::instrument(name = "Getting session claims", skip_all)]
pub fn get_claims(jar: &CookieJar) -> Result<Claims, AuthAPIError> {
    let token = jar
        .get(SESSION_COOKIE_NAME)
        .ok_or(AuthAPIError::MissingToken)?
        .value()
        .to_owned();

    decode_token(&Secret::new(token), &JWT_SECRET)
        .map_err(|_| AuthAPIError::InvalidToken)
}

// Shorthand for handlers that only need the session user
pub fn get_session_user(jar: &CookieJar) -> Result<User, AuthAPIError> {
    get_claims(jar)?.user()
}

// Create a session token for `user`, signed with the configured secret
#[tracing::instrument(name = "Generating auth token", skip_all)]
pub fn generate_auth_token(user: &User) -> Result<Secret<String>> {
    encode_token(&claims_for(user)?, &JWT_SECRET)
}

fn claims_for(user: &User) -> Result<Claims> {
    let delta = chrono::Duration::try_seconds(TOKEN_TTL_SECONDS)
        .wrap_err("Failed to create token lifetime")?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(eyre!("failed to add to current time"))?
        .timestamp();

    // Cast exp to a usize, which is what Claims expects
    let exp: usize = exp.try_into().wrap_err(format!(
        "failed to cast exp time to usize. exp time: {}",
        exp
    ))?;

    Ok(Claims {
        sub: user.id.as_ref().to_string(),
        email: user.email.as_str().to_owned(),
        name: user.name.clone(),
        exp,
    })
}

#[tracing::instrument(name = "Encoding auth token", skip_all)]
pub fn encode_token(
    claims: &Claims,
    secret: &Secret<String>,
) -> Result<Secret<String>> {
    let token_string = encode(
        &jsonwebtoken::Header::default(),
        claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .wrap_err("failed to create token")?;

    Ok(Secret::new(token_string))
}

// Check if the token is valid by decoding it with the shared secret
#[tracing::instrument(name = "Validating auth token", skip_all)]
pub fn decode_token(
    token: &Secret<String>,
    secret: &Secret<String>,
) -> Result<Claims> {
    decode::<Claims>(
        token.expose_secret(),
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .wrap_err("failed to decode token")
}

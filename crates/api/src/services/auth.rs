//! # Auth Service
//!
//! Registration, login and token verification. Tokens are HS256 JWTs that
//! carry the user's id, role, email and name and expire after seven days.

use chrono::{DateTime, Duration, Utc};
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::user::{AuthResponse, LoginRequest, RegisterRequest, Role, User},
};
use clinic_db::Store;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::{hash_password, verify_password};

/// Lifetime of an issued token.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims embedded in every bearer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, user: &User) -> ClinicResult<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> ClinicResult<String> {
        let claims = Claims {
            sub: user.id,
            role: user.role,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ClinicError::Internal(Box::new(e)))
    }

    /// Checks signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> ClinicResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected token: {}", e);
                ClinicError::Unauthorized("Invalid token".to_string())
            })
    }
}

/// Creates a patient account and signs the new user in.
///
/// # Errors
///
/// * `ClinicError::Validation` - name empty, email malformed or password
///   shorter than six characters
/// * `ClinicError::EmailTaken` - the email is already registered
pub async fn register(
    store: &dyn Store,
    keys: &TokenKeys,
    request: RegisterRequest,
) -> ClinicResult<AuthResponse> {
    request.validate()?;

    if store.find_user_by_email(&request.email).await?.is_some() {
        return Err(ClinicError::EmailTaken);
    }

    let password_hash = hash_password(&request.password)?;

    // The unique email constraint still decides a race with a concurrent
    // registration
    let db_user = store
        .create_user(&request.name, &request.email, &password_hash, Role::Patient)
        .await?
        .ok_or(ClinicError::EmailTaken)?;
    let user = User::try_from(db_user)?;

    info!("Registered patient: id={}", user.id);

    Ok(AuthResponse {
        token: keys.issue(&user)?,
        role: user.role,
    })
}

/// Exchanges credentials for a token.
///
/// Unknown email and wrong password produce the same error. Throttling is
/// applied by the caller, which knows the request's source address.
pub async fn login(
    store: &dyn Store,
    keys: &TokenKeys,
    request: LoginRequest,
) -> ClinicResult<AuthResponse> {
    request.validate()?;

    let db_user = store
        .find_user_by_email(&request.email)
        .await?
        .ok_or(ClinicError::InvalidCredentials)?;

    if !verify_password(&request.password, &db_user.password_hash)? {
        return Err(ClinicError::InvalidCredentials);
    }

    let user = User::try_from(db_user)?;
    info!("User logged in: id={}, role={}", user.id, user.role);

    Ok(AuthResponse {
        token: keys.issue(&user)?,
        role: user.role,
    })
}

/// Resolves an `Authorization` header value to the user it names.
///
/// The user record is re-read on every call, so the returned role is the
/// stored one rather than whatever the token claims.
pub async fn authenticate(
    store: &dyn Store,
    keys: &TokenKeys,
    authorization: Option<&str>,
) -> ClinicResult<User> {
    let token = authorization
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ClinicError::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let claims = keys.verify(token)?;

    let db_user = store
        .find_user_by_id(claims.sub)
        .await?
        .ok_or_else(|| ClinicError::Unauthorized("User not found".to_string()))?;

    User::try_from(db_user)
}

//! # Authentication Module
//!
//! Password hashing with Argon2 and the [`AuthUser`] extractor that turns an
//! `Authorization: Bearer <token>` header into a verified user.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use clinic_core::models::user::User;
use eyre::Result;

use crate::{middleware::error_handling::AppError, services, ApiState};

/// Hashes a password using the Argon2 algorithm
///
/// Returns the hash in PHC string format, which embeds the algorithm,
/// parameters and a freshly generated salt.
///
/// # Example
///
/// ```
/// use clinic_api::middleware::auth::{hash_password, verify_password};
///
/// let hashed = hash_password("secret1").unwrap();
/// assert!(verify_password("secret1", &hashed).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    // Generate a fresh, random salt
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks a plain text password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// The authenticated caller of a request.
///
/// Extraction fails with `UNAUTHORIZED` if the header is missing or not a
/// bearer token, the token is malformed, tampered with or expired, or the
/// user it names no longer exists.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let user = services::auth::authenticate(state.store.as_ref(), &state.keys, header).await?;

        Ok(AuthUser(user))
    }
}

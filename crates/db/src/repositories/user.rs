use crate::models::DbUser;
use chrono::Utc;
use clinic_core::models::user::Role;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Inserts a new user. Returns `None` when the email is already registered,
/// including when a concurrent registration won the race.
pub async fn create_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<Option<DbUser>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, email={}, role={}", id, email, role);

    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO NOTHING
        RETURNING id, name, email, password_hash, role, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .fetch_optional(pool)
    .await?;

    if user.is_none() {
        tracing::debug!("Email already registered: {}", email);
    }

    Ok(user)
}

/// Creates the user or, if the email exists, overwrites its name, password
/// hash and role. Used by seeding.
pub async fn upsert_user(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<DbUser> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (id, name, email, password_hash, role, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email)
        DO UPDATE SET name = $2, password_hash = $4, role = $5
        RETURNING id, name, email, password_hash, role, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, password_hash, role, created_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, password_hash, role, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

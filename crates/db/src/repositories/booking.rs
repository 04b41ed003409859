use crate::models::{DbBooking, DbBookingDetails, DbBookingWithSlot};
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Reserves a slot for a user.
///
/// Returns `None` when the slot already has a booking. The check is the
/// unique constraint on `bookings.slot_id`: of several concurrent inserts
/// for the same slot, Postgres lets exactly one through and the rest hit
/// the conflict clause.
pub async fn create_booking(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    slot_id: Uuid,
) -> Result<Option<DbBooking>> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, user_id, slot_id, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (slot_id) DO NOTHING
        RETURNING id, user_id, slot_id, created_at
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(slot_id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn list_bookings_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
) -> Result<Vec<DbBookingWithSlot>> {
    let bookings = sqlx::query_as::<_, DbBookingWithSlot>(
        r#"
        SELECT b.id, b.user_id, b.slot_id, b.created_at,
               s.start_at AS slot_start_at, s.end_at AS slot_end_at
        FROM bookings b
        JOIN slots s ON s.id = b.slot_id
        WHERE b.user_id = $1
        ORDER BY b.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn list_all_bookings(pool: &Pool<Postgres>) -> Result<Vec<DbBookingDetails>> {
    let bookings = sqlx::query_as::<_, DbBookingDetails>(
        r#"
        SELECT b.id, b.user_id, b.slot_id, b.created_at,
               s.start_at AS slot_start_at, s.end_at AS slot_end_at,
               u.name AS user_name, u.email AS user_email,
               u.role AS user_role, u.created_at AS user_created_at
        FROM bookings b
        JOIN slots s ON s.id = b.slot_id
        JOIN users u ON u.id = b.user_id
        ORDER BY b.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

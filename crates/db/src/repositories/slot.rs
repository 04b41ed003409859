use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use clinic_core::models::slot::SlotWindow;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Persists the given windows in one statement, silently skipping any
/// `(start_at, end_at)` pair that already exists. Returns how many rows were
/// actually inserted.
pub async fn create_slots(pool: &Pool<Postgres>, windows: &[SlotWindow]) -> Result<u64> {
    if windows.is_empty() {
        return Ok(0);
    }

    let (starts, ends): (Vec<DateTime<Utc>>, Vec<DateTime<Utc>>) = windows
        .iter()
        .map(|window| (window.start_at, window.end_at))
        .unzip();

    let result = sqlx::query(
        r#"
        INSERT INTO slots (id, start_at, end_at)
        SELECT gen_random_uuid(), w.start_at, w.end_at
        FROM UNNEST($1::timestamptz[], $2::timestamptz[]) AS w(start_at, end_at)
        ON CONFLICT (start_at, end_at) DO NOTHING
        "#,
    )
    .bind(starts)
    .bind(ends)
    .execute(pool)
    .await?;

    tracing::debug!(
        "Ensured {} slot windows, {} newly inserted",
        windows.len(),
        result.rows_affected()
    );

    Ok(result.rows_affected())
}

pub async fn find_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, start_at, end_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

/// Slots lying entirely within `[from, to]` that have no booking, earliest
/// first.
pub async fn list_available_slots(
    pool: &Pool<Postgres>,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT s.id, s.start_at, s.end_at
        FROM slots s
        WHERE s.start_at >= $1
          AND s.end_at <= $2
          AND NOT EXISTS (SELECT 1 FROM bookings b WHERE b.slot_id = s.id)
        ORDER BY s.start_at ASC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

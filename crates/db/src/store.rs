//! # Persistence Gateway
//!
//! [`Store`] is the seam between the HTTP layer and persistence. The
//! production implementation, [`PgStore`], delegates to the per-table
//! repository functions; [`crate::mock`] provides an in-memory implementation
//! with the same uniqueness guarantees and a `mockall` mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_core::models::{slot::SlotWindow, user::Role};
use eyre::Result;
use uuid::Uuid;

use crate::{
    models::{DbBooking, DbBookingDetails, DbBookingWithSlot, DbSlot, DbUser},
    repositories, DbPool,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns `None` if the email is taken.
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<DbUser>>;

    async fn upsert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<DbUser>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>>;

    /// Returns the number of windows that were not already stored.
    async fn create_slots(&self, windows: &[SlotWindow]) -> Result<u64>;

    async fn find_slot_by_id(&self, id: Uuid) -> Result<Option<DbSlot>>;

    async fn list_available_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DbSlot>>;

    /// Returns `None` if the slot is already booked.
    async fn create_booking(&self, user_id: Uuid, slot_id: Uuid) -> Result<Option<DbBooking>>;

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<DbBookingWithSlot>>;

    async fn list_all_bookings(&self) -> Result<Vec<DbBookingDetails>>;
}

/// [`Store`] backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<DbUser>> {
        repositories::user::create_user(&self.pool, name, email, password_hash, role).await
    }

    async fn upsert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<DbUser> {
        repositories::user::upsert_user(&self.pool, name, email, password_hash, role).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        repositories::user::find_user_by_email(&self.pool, email).await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>> {
        repositories::user::find_user_by_id(&self.pool, id).await
    }

    async fn create_slots(&self, windows: &[SlotWindow]) -> Result<u64> {
        repositories::slot::create_slots(&self.pool, windows).await
    }

    async fn find_slot_by_id(&self, id: Uuid) -> Result<Option<DbSlot>> {
        repositories::slot::find_slot_by_id(&self.pool, id).await
    }

    async fn list_available_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DbSlot>> {
        repositories::slot::list_available_slots(&self.pool, from, to).await
    }

    async fn create_booking(&self, user_id: Uuid, slot_id: Uuid) -> Result<Option<DbBooking>> {
        repositories::booking::create_booking(&self.pool, user_id, slot_id).await
    }

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<DbBookingWithSlot>> {
        repositories::booking::list_bookings_for_user(&self.pool, user_id).await
    }

    async fn list_all_bookings(&self) -> Result<Vec<DbBookingDetails>> {
        repositories::booking::list_all_bookings(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::create_test_pool;
    use chrono::NaiveDate;
    use clinic_core::slot_generator::{day_bounds, generate_slots};

    // These run against a real Postgres (TEST_DATABASE_URL) and are skipped
    // by default: cargo test -p clinic-db -- --ignored

    #[tokio::test]
    #[ignore = "requires a Postgres test database"]
    async fn concurrent_bookings_for_one_slot_yield_one_winner() {
        let store = PgStore::new(create_test_pool().await);
        let day = NaiveDate::from_ymd_opt(2031, 1, 6).unwrap();
        store.create_slots(&generate_slots(day, day)).await.unwrap();
        let (from, to) = day_bounds(day, day);
        let slot = store.list_available_slots(from, to).await.unwrap()[0].clone();

        let email_a = format!("{}@example.com", Uuid::new_v4());
        let email_b = format!("{}@example.com", Uuid::new_v4());
        let a = store
            .create_user("A", &email_a, "hash", Role::Patient)
            .await
            .unwrap()
            .unwrap();
        let b = store
            .create_user("B", &email_b, "hash", Role::Patient)
            .await
            .unwrap()
            .unwrap();

        let (first, second) = tokio::join!(
            store.create_booking(a.id, slot.id),
            store.create_booking(b.id, slot.id)
        );
        let winners = [first.unwrap(), second.unwrap()]
            .into_iter()
            .filter(Option::is_some)
            .count();
        assert_eq!(winners, 1);
    }

    #[tokio::test]
    #[ignore = "requires a Postgres test database"]
    async fn slot_creation_skips_existing_pairs() {
        let store = PgStore::new(create_test_pool().await);
        let day = NaiveDate::from_ymd_opt(2031, 2, 3).unwrap();
        let windows = generate_slots(day, day);

        store.create_slots(&windows).await.unwrap();
        assert_eq!(store.create_slots(&windows).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires a Postgres test database"]
    async fn duplicate_email_is_reported_as_none() {
        let store = PgStore::new(create_test_pool().await);
        let email = format!("{}@example.com", Uuid::new_v4());

        let first = store.create_user("A", &email, "hash", Role::Patient).await.unwrap();
        let second = store.create_user("B", &email, "hash", Role::Patient).await.unwrap();
        assert!(first.is_some());
        assert!(second.is_none());
    }
}

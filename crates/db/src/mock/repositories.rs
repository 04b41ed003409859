use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_core::models::{slot::SlotWindow, user::Role};
use mockall::mock;
use uuid::Uuid;

use crate::{
    models::{DbBooking, DbBookingDetails, DbBookingWithSlot, DbSlot, DbUser},
    store::Store,
};

// Mock store for failure-injection tests
mock! {
    pub Store {}

    #[async_trait]
    impl Store for Store {
        async fn create_user(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
            role: Role,
        ) -> eyre::Result<Option<DbUser>>;

        async fn upsert_user(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
            role: Role,
        ) -> eyre::Result<DbUser>;

        async fn find_user_by_email(&self, email: &str) -> eyre::Result<Option<DbUser>>;

        async fn find_user_by_id(&self, id: Uuid) -> eyre::Result<Option<DbUser>>;

        async fn create_slots(&self, windows: &[SlotWindow]) -> eyre::Result<u64>;

        async fn find_slot_by_id(&self, id: Uuid) -> eyre::Result<Option<DbSlot>>;

        async fn list_available_slots(
            &self,
            from: DateTime<Utc>,
            to: DateTime<Utc>,
        ) -> eyre::Result<Vec<DbSlot>>;

        async fn create_booking(
            &self,
            user_id: Uuid,
            slot_id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        async fn list_bookings_for_user(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Vec<DbBookingWithSlot>>;

        async fn list_all_bookings(&self) -> eyre::Result<Vec<DbBookingDetails>>;
    }
}

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_core::models::{slot::SlotWindow, user::Role};
use eyre::{eyre, Result};
use uuid::Uuid;

use crate::{
    models::{DbBooking, DbBookingDetails, DbBookingWithSlot, DbSlot, DbUser},
    store::Store,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<DbUser>,
    slots: Vec<DbSlot>,
    bookings: Vec<DbBooking>,
}

/// In-process [`Store`] that enforces the same unique keys as the Postgres
/// schema: `users.email`, `slots(start_at, end_at)` and `bookings.slot_id`.
///
/// Every operation runs under one lock, so concurrent bookings of a slot
/// resolve exactly like the database: one wins, the rest see a conflict.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| eyre!("in-memory store lock poisoned"))
    }
}

fn user_row(tables: &Tables, id: Uuid) -> Result<&DbUser> {
    tables
        .users
        .iter()
        .find(|user| user.id == id)
        .ok_or_else(|| eyre!("booking references missing user {}", id))
}

fn slot_row(tables: &Tables, id: Uuid) -> Result<&DbSlot> {
    tables
        .slots
        .iter()
        .find(|slot| slot.id == id)
        .ok_or_else(|| eyre!("booking references missing slot {}", id))
}

/// Bookings newest first; ties keep the later insert first.
fn newest_first<'a>(bookings: impl DoubleEndedIterator<Item = &'a DbBooking>) -> Vec<&'a DbBooking> {
    let mut rows: Vec<&DbBooking> = bookings.rev().collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Option<DbUser>> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|user| user.email == email) {
            return Ok(None);
        }

        let user = DbUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(Some(user))
    }

    async fn upsert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<DbUser> {
        let mut tables = self.tables()?;
        if let Some(user) = tables.users.iter_mut().find(|user| user.email == email) {
            user.name = name.to_string();
            user.password_hash = password_hash.to_string();
            user.role = role.as_str().to_string();
            return Ok(user.clone());
        }

        let user = DbUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<DbUser>> {
        let tables = self.tables()?;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn create_slots(&self, windows: &[SlotWindow]) -> Result<u64> {
        let mut tables = self.tables()?;
        let mut inserted = 0;
        for window in windows {
            let exists = tables
                .slots
                .iter()
                .any(|slot| slot.start_at == window.start_at && slot.end_at == window.end_at);
            if !exists {
                tables.slots.push(DbSlot {
                    id: Uuid::new_v4(),
                    start_at: window.start_at,
                    end_at: window.end_at,
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn find_slot_by_id(&self, id: Uuid) -> Result<Option<DbSlot>> {
        let tables = self.tables()?;
        Ok(tables.slots.iter().find(|slot| slot.id == id).cloned())
    }

    async fn list_available_slots(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<DbSlot>> {
        let tables = self.tables()?;
        let mut slots: Vec<DbSlot> = tables
            .slots
            .iter()
            .filter(|slot| slot.start_at >= from && slot.end_at <= to)
            .filter(|slot| !tables.bookings.iter().any(|booking| booking.slot_id == slot.id))
            .cloned()
            .collect();
        slots.sort_by_key(|slot| slot.start_at);
        Ok(slots)
    }

    async fn create_booking(&self, user_id: Uuid, slot_id: Uuid) -> Result<Option<DbBooking>> {
        let mut tables = self.tables()?;
        user_row(&tables, user_id)?;
        slot_row(&tables, slot_id)?;
        if tables.bookings.iter().any(|booking| booking.slot_id == slot_id) {
            return Ok(None);
        }

        let booking = DbBooking {
            id: Uuid::new_v4(),
            user_id,
            slot_id,
            created_at: Utc::now(),
        };
        tables.bookings.push(booking.clone());
        Ok(Some(booking))
    }

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<DbBookingWithSlot>> {
        let tables = self.tables()?;
        newest_first(tables.bookings.iter().filter(|booking| booking.user_id == user_id))
            .into_iter()
            .map(|booking| -> Result<DbBookingWithSlot> {
                let slot = slot_row(&tables, booking.slot_id)?;
                Ok(DbBookingWithSlot {
                    id: booking.id,
                    user_id: booking.user_id,
                    slot_id: booking.slot_id,
                    created_at: booking.created_at,
                    slot_start_at: slot.start_at,
                    slot_end_at: slot.end_at,
                })
            })
            .collect()
    }

    async fn list_all_bookings(&self) -> Result<Vec<DbBookingDetails>> {
        let tables = self.tables()?;
        newest_first(tables.bookings.iter())
            .into_iter()
            .map(|booking| -> Result<DbBookingDetails> {
                let slot = slot_row(&tables, booking.slot_id)?;
                let user = user_row(&tables, booking.user_id)?;
                Ok(DbBookingDetails {
                    id: booking.id,
                    user_id: booking.user_id,
                    slot_id: booking.slot_id,
                    created_at: booking.created_at,
                    slot_start_at: slot.start_at,
                    slot_end_at: slot.end_at,
                    user_name: user.name.clone(),
                    user_email: user.email.clone(),
                    user_role: user.role.clone(),
                    user_created_at: user.created_at,
                })
            })
            .collect()
    }
}

use chrono::{DateTime, Utc};
use clinic_core::{
    errors::ClinicError,
    models::{
        booking::{Booking, BookingDetails, BookingWithSlot},
        slot::Slot,
        user::User,
    },
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Booking row joined with its slot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingWithSlot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub slot_start_at: DateTime<Utc>,
    pub slot_end_at: DateTime<Utc>,
}

/// Booking row joined with its slot and the booking user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBookingDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub slot_start_at: DateTime<Utc>,
    pub slot_end_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub user_role: String,
    pub user_created_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = ClinicError;

    fn try_from(user: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.parse()?,
            created_at: user.created_at,
        })
    }
}

impl From<DbSlot> for Slot {
    fn from(slot: DbSlot) -> Self {
        Slot {
            id: slot.id,
            start_at: slot.start_at,
            end_at: slot.end_at,
        }
    }
}

impl From<DbBooking> for Booking {
    fn from(booking: DbBooking) -> Self {
        Booking {
            id: booking.id,
            user_id: booking.user_id,
            slot_id: booking.slot_id,
            created_at: booking.created_at,
        }
    }
}

impl From<DbBookingWithSlot> for BookingWithSlot {
    fn from(row: DbBookingWithSlot) -> Self {
        BookingWithSlot {
            booking: Booking {
                id: row.id,
                user_id: row.user_id,
                slot_id: row.slot_id,
                created_at: row.created_at,
            },
            slot: Slot {
                id: row.slot_id,
                start_at: row.slot_start_at,
                end_at: row.slot_end_at,
            },
        }
    }
}

impl TryFrom<DbBookingDetails> for BookingDetails {
    type Error = ClinicError;

    fn try_from(row: DbBookingDetails) -> Result<Self, Self::Error> {
        Ok(BookingDetails {
            booking: Booking {
                id: row.id,
                user_id: row.user_id,
                slot_id: row.slot_id,
                created_at: row.created_at,
            },
            slot: Slot {
                id: row.slot_id,
                start_at: row.slot_start_at,
                end_at: row.slot_end_at,
            },
            user: User {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
                role: row.user_role.parse()?,
                created_at: row.user_created_at,
            },
        })
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{slot::Slot, user::User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slot_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub slot_id: Uuid,
}

/// A booking together with the slot it reserves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingWithSlot {
    #[serde(flatten)]
    pub booking: Booking,
    pub slot: Slot,
}

/// A booking with both its slot and the patient who made it, as shown to
/// administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub slot: Slot,
    pub user: User,
}

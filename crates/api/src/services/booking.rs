//! # Booking Service
//!
//! A slot is either available or booked; booking is terminal. Exclusivity is
//! delegated to the store's unique constraint on the booked slot, so there is
//! no locking here: of two racing requests the store admits one and the other
//! is reported as `SLOT_TAKEN`.

use chrono::NaiveDate;
use clinic_core::{
    errors::{ClinicError, ClinicResult},
    models::{
        booking::{Booking, BookingDetails, BookingWithSlot},
        slot::Slot,
        user::{Role, User},
    },
    slot_generator::{day_bounds, generate_slots},
};
use clinic_db::Store;
use tracing::info;
use uuid::Uuid;

fn require_role(user: &User, role: Role, message: &str) -> ClinicResult<()> {
    if user.role == role {
        Ok(())
    } else {
        Err(ClinicError::Forbidden(message.to_string()))
    }
}

/// Reserves `slot_id` for a patient.
///
/// # Errors
///
/// * `ClinicError::Forbidden` - the caller is not a patient
/// * `ClinicError::NotFound` - no slot has this id
/// * `ClinicError::SlotTaken` - the slot already has a booking
pub async fn book(store: &dyn Store, user: &User, slot_id: Uuid) -> ClinicResult<Booking> {
    require_role(user, Role::Patient, "Only patients can book")?;

    store
        .find_slot_by_id(slot_id)
        .await?
        .ok_or_else(|| ClinicError::NotFound("Slot not found".to_string()))?;

    let booking = store
        .create_booking(user.id, slot_id)
        .await?
        .ok_or(ClinicError::SlotTaken)?;

    info!("Slot booked: slot={}, user={}", slot_id, user.id);

    Ok(booking.into())
}

/// Unbooked slots for the days `from..=to`, earliest first.
///
/// Slots for the range are generated on demand; windows that already exist
/// are left untouched.
pub async fn list_available(
    store: &dyn Store,
    from: NaiveDate,
    to: NaiveDate,
) -> ClinicResult<Vec<Slot>> {
    store.create_slots(&generate_slots(from, to)).await?;

    let (start, end) = day_bounds(from, to);
    let slots = store.list_available_slots(start, end).await?;

    Ok(slots.into_iter().map(Slot::from).collect())
}

/// The caller's bookings with their slots, most recent first.
pub async fn list_mine(store: &dyn Store, user: &User) -> ClinicResult<Vec<BookingWithSlot>> {
    require_role(user, Role::Patient, "Patients only")?;

    let bookings = store.list_bookings_for_user(user.id).await?;

    Ok(bookings.into_iter().map(BookingWithSlot::from).collect())
}

/// Every booking with slot and patient, for administrators.
pub async fn list_all(store: &dyn Store, user: &User) -> ClinicResult<Vec<BookingDetails>> {
    require_role(user, Role::Admin, "Admins only")?;

    store
        .list_all_bookings()
        .await?
        .into_iter()
        .map(BookingDetails::try_from)
        .collect()
}

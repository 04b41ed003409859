use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{from_value, json, to_value};
use clinic_core::models::{
    booking::{BookRequest, Booking, BookingDetails, BookingWithSlot},
    slot::Slot,
    user::{LoginRequest, RegisterRequest, Role, User},
};
use uuid::Uuid;
use validator::Validate;

fn sample_slot() -> Slot {
    Slot {
        id: Uuid::new_v4(),
        start_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        end_at: Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap(),
    }
}

#[test]
fn test_role_wire_format() {
    assert_eq!(to_value(Role::Patient).unwrap(), json!("patient"));
    assert_eq!(to_value(Role::Admin).unwrap(), json!("admin"));
    assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
    assert!("doctor".parse::<Role>().is_err());
}

#[test]
fn test_slot_uses_camel_case() {
    let slot = sample_slot();
    let value = to_value(&slot).unwrap();

    assert_eq!(value["startAt"], json!("2024-01-01T09:00:00Z"));
    assert_eq!(value["endAt"], json!("2024-01-01T09:30:00Z"));
    assert_eq!(value["id"], json!(slot.id.to_string()));
}

#[test]
fn test_booking_with_slot_flattens_booking() {
    let slot = sample_slot();
    let booking = Booking {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        slot_id: slot.id,
        created_at: Utc::now(),
    };
    let value = to_value(BookingWithSlot {
        booking: booking.clone(),
        slot: slot.clone(),
    })
    .unwrap();

    assert_eq!(value["id"], json!(booking.id.to_string()));
    assert_eq!(value["slotId"], json!(slot.id.to_string()));
    assert_eq!(value["slot"]["startAt"], json!("2024-01-01T09:00:00Z"));
}

#[test]
fn test_booking_details_include_user() {
    let slot = sample_slot();
    let user = User {
        id: Uuid::new_v4(),
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        role: Role::Patient,
        created_at: Utc::now(),
    };
    let details = BookingDetails {
        booking: Booking {
            id: Uuid::new_v4(),
            user_id: user.id,
            slot_id: slot.id,
            created_at: Utc::now(),
        },
        slot,
        user,
    };
    let value = to_value(&details).unwrap();

    assert_eq!(value["user"]["email"], json!("jane@example.com"));
    assert_eq!(value["user"]["role"], json!("patient"));
    assert!(value["user"].get("passwordHash").is_none());
}

#[test]
fn test_book_request_requires_uuid() {
    let id = Uuid::new_v4();
    let request: BookRequest = from_value(json!({ "slotId": id })).unwrap();
    assert_eq!(request.slot_id, id);

    assert!(from_value::<BookRequest>(json!({ "slotId": "not-a-uuid" })).is_err());
}

#[test]
fn test_register_request_validation() {
    let valid = RegisterRequest {
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
    };
    assert!(valid.validate().is_ok());

    let short_password = RegisterRequest {
        password: "12345".to_string(),
        ..valid.clone()
    };
    assert!(short_password.validate().is_err());

    let empty_name = RegisterRequest {
        name: String::new(),
        ..valid
    };
    assert!(empty_name.validate().is_err());
}

#[test]
fn test_login_request_validation() {
    let valid = LoginRequest {
        email: "jane@example.com".to_string(),
        password: "secret1".to_string(),
    };
    assert!(valid.validate().is_ok());

    let bad_email = LoginRequest {
        email: "jane".to_string(),
        ..valid
    };
    assert!(bad_email.validate().is_err());
}

mod test_utils;

use std::future::IntoFuture;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use clinic_api::services::auth::TokenKeys;
use clinic_core::models::{
    booking::{Booking, BookingDetails, BookingWithSlot},
    slot::Slot,
    user::{Role, User},
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_utils::{bearer, TestApp, TEST_SECRET};
use uuid::Uuid;

async fn day_slots(app: &TestApp) -> Vec<Slot> {
    app.server
        .get("/api/slots")
        .add_query_param("from", "2024-03-04")
        .add_query_param("to", "2024-03-04")
        .await
        .json::<Vec<Slot>>()
}

async fn book(app: &TestApp, token: &str, slot_id: Uuid) -> axum_test::TestResponse {
    let (name, value) = bearer(token);
    app.server
        .post("/api/book")
        .add_header(name, value)
        .json(&json!({ "slotId": slot_id }))
        .await
}

#[tokio::test]
async fn test_second_booking_of_slot_conflicts() {
    let app = TestApp::new();
    let jane = app.register_patient("Jane", "jane@example.com").await;
    let john = app.register_patient("John", "john@example.com").await;
    let slot = day_slots(&app).await[0].clone();

    book(&app, &jane, slot.id).await.assert_status(StatusCode::CREATED);
    let response = book(&app, &john, slot.id).await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": { "code": "SLOT_TAKEN", "message": "This slot is already booked" } })
    );
}

#[tokio::test]
async fn test_concurrent_bookings_have_one_winner() {
    let app = TestApp::new();
    let jane = app.register_patient("Jane", "jane@example.com").await;
    let john = app.register_patient("John", "john@example.com").await;
    let slot = day_slots(&app).await[5].clone();

    let (jane_name, jane_value) = bearer(&jane);
    let (john_name, john_value) = bearer(&john);
    let first = app
        .server
        .post("/api/book")
        .add_header(jane_name, jane_value)
        .json(&json!({ "slotId": slot.id }));
    let second = app
        .server
        .post("/api/book")
        .add_header(john_name, john_value)
        .json(&json!({ "slotId": slot.id }));

    let (first, second) = tokio::join!(first.into_future(), second.into_future());

    let mut statuses = vec![first.status_code(), second.status_code()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
async fn test_book_requires_token() {
    let app = TestApp::new();
    let slot = day_slots(&app).await[0].clone();

    let response = app
        .server
        .post("/api/book")
        .json(&json!({ "slotId": slot.id }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_book_rejects_tampered_token() {
    let app = TestApp::new();
    let token = app.register_patient("Jane", "jane@example.com").await;
    let slot = day_slots(&app).await[0].clone();

    let mut tampered = token.clone();
    tampered.push('x');

    book(&app, &tampered, slot.id)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_rejects_token_signed_with_other_secret() {
    let app = TestApp::new();
    app.register_patient("Jane", "jane@example.com").await;
    let slot = day_slots(&app).await[0].clone();
    let user = User {
        id: Uuid::new_v4(),
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        role: Role::Patient,
        created_at: Utc::now(),
    };
    let forged = TokenKeys::new(b"another-secret").issue(&user).unwrap();

    book(&app, &forged, slot.id)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_book_rejects_expired_token() {
    let app = TestApp::new();
    let slot = day_slots(&app).await[0].clone();
    let user = User {
        id: Uuid::new_v4(),
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        role: Role::Patient,
        created_at: Utc::now(),
    };
    let expired = TokenKeys::new(TEST_SECRET.as_bytes())
        .issue_at(&user, Utc::now() - Duration::days(8))
        .unwrap();

    book(&app, &expired, slot.id)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_book() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let slot = day_slots(&app).await[0].clone();

    let response = book(&app, &admin, slot.id).await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_book_unknown_slot_is_not_found() {
    let app = TestApp::new();
    let token = app.register_patient("Jane", "jane@example.com").await;

    let response = book(&app, &token, Uuid::new_v4()).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_book_rejects_malformed_slot_id() {
    let app = TestApp::new();
    let token = app.register_patient("Jane", "jane@example.com").await;
    let (name, value) = bearer(&token);

    let response = app
        .server
        .post("/api/book")
        .add_header(name, value)
        .json(&json!({ "slotId": "not-a-uuid" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_my_bookings_newest_first() {
    let app = TestApp::new();
    let jane = app.register_patient("Jane", "jane@example.com").await;
    let john = app.register_patient("John", "john@example.com").await;
    let slots = day_slots(&app).await;

    let first = book(&app, &jane, slots[2].id).await.json::<Booking>();
    let second = book(&app, &jane, slots[0].id).await.json::<Booking>();
    book(&app, &john, slots[1].id).await.assert_status(StatusCode::CREATED);

    let (name, value) = bearer(&jane);
    let response = app
        .server
        .get("/api/my-bookings")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let bookings = response.json::<Vec<BookingWithSlot>>();
    let ids: Vec<Uuid> = bookings.iter().map(|b| b.booking.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(bookings[0].slot.id, slots[0].id);
}

#[tokio::test]
async fn test_my_bookings_forbidden_for_admin() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let (name, value) = bearer(&admin);

    app.server
        .get("/api/my-bookings")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_all_bookings_lists_every_patient() {
    let app = TestApp::new();
    let jane = app.register_patient("Jane", "jane@example.com").await;
    let john = app.register_patient("John", "john@example.com").await;
    let admin = app.admin_token().await;
    let slots = day_slots(&app).await;

    book(&app, &jane, slots[0].id).await.assert_status(StatusCode::CREATED);
    book(&app, &john, slots[1].id).await.assert_status(StatusCode::CREATED);

    let (name, value) = bearer(&admin);
    let response = app
        .server
        .get("/api/all-bookings")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let bookings = response.json::<Vec<BookingDetails>>();
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[0].user.email, "john@example.com");
    assert_eq!(bookings[1].user.email, "jane@example.com");
    assert_eq!(bookings[1].slot.id, slots[0].id);

    let raw = app
        .server
        .get("/api/all-bookings")
        .add_header(bearer(&admin).0, bearer(&admin).1)
        .await
        .json::<Value>();
    assert!(raw[0]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_all_bookings_forbidden_for_patient() {
    let app = TestApp::new();
    let jane = app.register_patient("Jane", "jane@example.com").await;
    let (name, value) = bearer(&jane);

    let response = app
        .server
        .get("/api/all-bookings")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["error"]["code"], "FORBIDDEN");
}

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use clinic_core::{
    errors::ClinicError,
    models::{
        booking::{BookRequest, Booking, BookingDetails, BookingWithSlot},
        user::Role,
    },
};

use crate::{
    middleware::{auth::AuthUser, error_handling::AppError},
    services, ApiState,
};

/// `POST /api/book` (patients)
///
/// Authentication and role are checked before the body is looked at, so an
/// anonymous request with a bad body still gets 401 and an administrator
/// gets 403.
#[axum::debug_handler]
pub async fn book(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
    payload: Result<Json<BookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    if user.role != Role::Patient {
        return Err(AppError(ClinicError::Forbidden(
            "Only patients can book".to_string(),
        )));
    }
    let Json(payload) = payload?;

    let booking = services::booking::book(state.store.as_ref(), &user, payload.slot_id).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// `GET /api/my-bookings` (patients)
#[axum::debug_handler]
pub async fn my_bookings(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<BookingWithSlot>>, AppError> {
    let bookings = services::booking::list_mine(state.store.as_ref(), &user).await?;

    Ok(Json(bookings))
}

/// `GET /api/all-bookings` (administrators)
#[axum::debug_handler]
pub async fn all_bookings(
    State(state): State<Arc<ApiState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<BookingDetails>>, AppError> {
    let bookings = services::booking::list_all(state.store.as_ref(), &user).await?;

    Ok(Json(bookings))
}

//! # Slot Handlers
//!
//! Lists bookable slots for a range of calendar days. Slots for the range
//! are created on first request, so there is no separate generation step.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use clinic_core::{errors::ClinicError, models::slot::Slot};
use serde::Deserialize;

use crate::{middleware::error_handling::AppError, services, ApiState};

/// Longest range, in days, a single request may ask for.
pub const MAX_RANGE_DAYS: i64 = 62;

/// Query parameters for the slot listing endpoint
///
/// Both bounds are calendar days in UTC, written `YYYY-MM-DD`. A full
/// RFC 3339 timestamp is also accepted; its UTC date is used.
#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Parses a `from`/`to` bound into a UTC calendar day.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(value)
            .ok()
            .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
    })
}

/// `GET /api/slots?from=YYYY-MM-DD&to=YYYY-MM-DD`
///
/// # Errors
///
/// * `ClinicError::Validation` - a bound is missing or unparseable, `from`
///   is after `to`, or the range exceeds [`MAX_RANGE_DAYS`]
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<Arc<ApiState>>,
    query: Result<Query<SlotQuery>, QueryRejection>,
) -> Result<Json<Vec<Slot>>, AppError> {
    let Query(query) = query?;

    let required = || ClinicError::Validation("from/to required YYYY-MM-DD".to_string());
    let from = query.from.as_deref().and_then(parse_day).ok_or_else(required)?;
    let to = query.to.as_deref().and_then(parse_day).ok_or_else(required)?;

    if from > to {
        return Err(AppError(ClinicError::Validation(
            "from must not be after to".to_string(),
        )));
    }
    if (to - from).num_days() >= MAX_RANGE_DAYS {
        return Err(AppError(ClinicError::Validation(format!(
            "Range may span at most {} days",
            MAX_RANGE_DAYS
        ))));
    }

    let slots = services::booking::list_available(state.store.as_ref(), from, to).await?;

    Ok(Json(slots))
}

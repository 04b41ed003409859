use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/book", post(handlers::bookings::book))
        .route("/api/my-bookings", get(handlers::bookings::my_bookings))
        .route("/api/all-bookings", get(handlers::bookings::all_bookings))
}

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use clinic_core::{
    errors::ClinicError,
    models::user::{AuthResponse, LoginRequest, RegisterRequest},
};

use crate::{
    middleware::{error_handling::AppError, rate_limit::client_key},
    services, ApiState,
};

/// `POST /api/register`
#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(payload) = payload?;

    let response = services::auth::register(state.store.as_ref(), &state.keys, payload).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /api/login`
#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    peer: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let client = client_key(&headers, peer.map(|ConnectInfo(addr)| addr));

    // Count the attempt before looking at the body
    if !state.throttle.check(&client) {
        tracing::warn!("Login throttled for {}", client);
        return Err(AppError(ClinicError::RateLimited));
    }
    let Json(payload) = payload?;

    let response = services::auth::login(state.store.as_ref(), &state.keys, payload).await?;

    Ok(Json(response))
}

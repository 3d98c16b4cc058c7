// src/handlers/schedule.rs
//
// Rotas do empregado autenticado: gestão das próprias agendas e turnos.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{EmployeeRole, RequireRole},
    models::scheduling::{
        Booking, CreateWindowPayload, RescheduleBookingPayload, UpdateBookingStatusPayload,
        WorkingWindow,
    },
};

// POST /api/schedule/windows
pub async fn create_window(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
    Json(payload): Json<CreateWindowPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let window = app_state
        .schedule_service
        .create_window(user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(window)))
}

// GET /api/schedule/windows
pub async fn list_my_windows(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
) -> Result<Json<Vec<WorkingWindow>>, AppError> {
    let windows = app_state.schedule_service.list_windows(user.id).await?;
    Ok(Json(windows))
}

// PUT /api/schedule/windows/{window_id}
pub async fn replace_window(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
    Path(window_id): Path<Uuid>,
    Json(payload): Json<CreateWindowPayload>,
) -> Result<Json<WorkingWindow>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let window = app_state
        .schedule_service
        .replace_window(user.id, window_id, payload)
        .await?;

    Ok(Json(window))
}

#[derive(Debug, Deserialize)]
pub struct BookingRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// GET /api/schedule/bookings?from=...&to=...
// Sem parâmetros, mostra os próximos 14 dias.
pub async fn list_my_bookings(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
    Query(query): Query<BookingRangeQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let from = query.from.unwrap_or_else(|| Local::now().date_naive());
    let to = query.to.unwrap_or(from + Duration::days(13));

    let bookings = app_state
        .schedule_service
        .bookings_between(user.id, from, to)
        .await?;

    Ok(Json(bookings))
}

// PUT /api/schedule/bookings/{booking_id}/time
pub async fn reschedule_booking(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<RescheduleBookingPayload>,
) -> Result<Json<Booking>, AppError> {
    let booking = app_state
        .booking_service
        .reschedule(booking_id, Some(user.id), payload.starts_at)
        .await?;

    Ok(Json(booking))
}

// PUT /api/schedule/bookings/{booking_id}/status
pub async fn update_booking_status(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<EmployeeRole>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusPayload>,
) -> Result<Json<Booking>, AppError> {
    let booking = app_state
        .schedule_service
        .update_status(booking_id, Some(user.id), payload.status)
        .await?;

    Ok(Json(booking))
}

// src/handlers/public.rs
//
// A superfície pública do núcleo: consulta de disponibilidade e reserva.
// Nenhuma das duas rotas exige autenticação.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::scheduling::{CreateBookingPayload, DayAvailability},
    services::availability::DEFAULT_HORIZON_DAYS,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AvailabilityQuery {
    /// Quantos dias à frente escanear. Padrão: 14.
    #[validate(range(min = 1, max = 90, message = "O horizonte deve estar entre 1 e 90 dias."))]
    pub days: Option<u32>,
}

// GET /api/public/availability/{employee_id}?days=N
pub async fn get_availability(
    State(app_state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<DayAvailability>>, AppError> {
    query.validate().map_err(AppError::ValidationError)?;

    let horizon = query.days.unwrap_or(DEFAULT_HORIZON_DAYS);
    let days = app_state
        .availability_service
        .compute(employee_id, horizon)
        .await?;

    Ok(Json(days))
}

// POST /api/public/bookings
pub async fn create_booking(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let booking = app_state.booking_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

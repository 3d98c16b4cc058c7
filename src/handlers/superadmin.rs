// src/handlers/superadmin.rs
//
// Modo super admin: CRUD de negócios (com provisionamento do admin),
// empregados, serviços e turnos de qualquer tenant.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{RequireRole, SuperAdminRole},
    models::{
        auth::{Role, User},
        business::{
            Business, CreateBusinessPayload, CreateServicePayload, Service,
            UpdateBusinessPayload, UpdateEmployeePayload, UpdateServicePayload,
        },
        scheduling::{
            Booking, CreateBookingPayload, RescheduleBookingPayload, UpdateBookingStatusPayload,
        },
    },
    services::auth::AuthService,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedBusiness {
    pub business: Business,
    pub admin: User,
}

// POST /api/superadmin/businesses
// Cria o negócio e o usuário admin dele na mesma transação: ou os dois
// existem, ou nenhum.
pub async fn create_business(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Json(payload): Json<CreateBusinessPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let password_hash = AuthService::hash_password(&payload.admin_password).await?;

    let mut tx = app_state.db_pool.begin().await?;

    let business = app_state
        .business_repo
        .create_business(
            &mut *tx,
            &payload.name,
            &payload.alias,
            &payload.address,
            &payload.province,
        )
        .await?;

    let admin = app_state
        .user_repo
        .create_user(
            &mut *tx,
            &payload.admin_name,
            &payload.admin_email,
            &password_hash,
            Role::Admin,
            Some(business.id),
        )
        .await?;

    app_state
        .business_repo
        .set_owner(&mut *tx, business.id, admin.id)
        .await?;

    tx.commit().await?;

    tracing::info!("🏪 Negócio '{}' provisionado com admin {}", business.alias, admin.email);

    Ok((StatusCode::CREATED, Json(ProvisionedBusiness { business, admin })))
}

// GET /api/superadmin/businesses
pub async fn list_businesses(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
) -> Result<Json<Vec<Business>>, AppError> {
    let businesses = app_state.business_repo.list_businesses().await?;
    Ok(Json(businesses))
}

// PUT /api/superadmin/businesses/{business_id}
pub async fn update_business(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(business_id): Path<Uuid>,
    Json(payload): Json<UpdateBusinessPayload>,
) -> Result<Json<Business>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let business = app_state
        .business_repo
        .update_business(
            business_id,
            payload.name.as_deref(),
            payload.alias.as_deref(),
            payload.address.as_deref(),
            payload.province.as_deref(),
        )
        .await?
        .ok_or(AppError::BusinessNotFound)?;

    Ok(Json(business))
}

// DELETE /api/superadmin/businesses/{business_id}
pub async fn delete_business(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(business_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.business_repo.delete_business(business_id).await?;
    if deleted == 0 {
        return Err(AppError::BusinessNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/superadmin/employees
pub async fn list_all_employees(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
) -> Result<Json<Vec<User>>, AppError> {
    let employees = app_state.user_repo.list_employees(None).await?;
    Ok(Json(employees))
}

// PUT /api/superadmin/employees/{employee_id}
pub async fn update_employee(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(employee_id): Path<Uuid>,
    Json(payload): Json<UpdateEmployeePayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let password_hash = match payload.password.as_deref() {
        Some(password) => Some(AuthService::hash_password(password).await?),
        None => None,
    };

    let employee = app_state
        .user_repo
        .update_employee(
            employee_id,
            payload.name.as_deref(),
            payload.email.as_deref(),
            password_hash.as_deref(),
        )
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(employee))
}

// DELETE /api/superadmin/employees/{employee_id}
pub async fn delete_any_employee(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(employee_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.user_repo.delete_employee(employee_id, None).await?;
    if deleted == 0 {
        return Err(AppError::UserNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/superadmin/services
pub async fn create_service(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Json(payload): Json<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service = app_state
        .business_repo
        .create_service(
            &payload.name,
            payload.description.as_deref(),
            payload.price,
            payload.duration_minutes,
            payload.business_id,
            payload.employee_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service)))
}

// GET /api/superadmin/services
pub async fn list_services(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = app_state.business_repo.list_services().await?;
    Ok(Json(services))
}

// PUT /api/superadmin/services/{service_id}
pub async fn update_service(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(service_id): Path<Uuid>,
    Json(payload): Json<UpdateServicePayload>,
) -> Result<Json<Service>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let service = app_state
        .business_repo
        .update_service(
            service_id,
            payload.name.as_deref(),
            payload.description.as_deref(),
            payload.price,
            payload.duration_minutes,
        )
        .await?
        .ok_or(AppError::ServiceNotFound)?;

    Ok(Json(service))
}

// DELETE /api/superadmin/services/{service_id}
pub async fn delete_service(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(service_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.business_repo.delete_service(service_id).await?;
    if deleted == 0 {
        return Err(AppError::ServiceNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/superadmin/bookings
pub async fn list_all_bookings(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = app_state.schedule_store.list_all_bookings().await?;
    Ok(Json(bookings))
}

// POST /api/superadmin/bookings
// Mesmo fluxo de validação da rota pública.
pub async fn create_booking(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Json(payload): Json<CreateBookingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let booking = app_state.booking_service.create(payload).await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

// PUT /api/superadmin/bookings/{booking_id}/time
pub async fn reschedule_booking(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<RescheduleBookingPayload>,
) -> Result<Json<Booking>, AppError> {
    let booking = app_state
        .booking_service
        .reschedule(booking_id, None, payload.starts_at)
        .await?;

    Ok(Json(booking))
}

// PUT /api/superadmin/bookings/{booking_id}/status
pub async fn update_booking_status(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusPayload>,
) -> Result<Json<Booking>, AppError> {
    let booking = app_state
        .schedule_service
        .update_status(booking_id, None, payload.status)
        .await?;

    Ok(Json(booking))
}

// DELETE /api/superadmin/bookings/{booking_id}
pub async fn delete_booking(
    State(app_state): State<AppState>,
    RequireRole(_, _): RequireRole<SuperAdminRole>,
    Path(booking_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let deleted = app_state.schedule_store.delete_booking(booking_id).await?;
    if deleted == 0 {
        return Err(AppError::BookingNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

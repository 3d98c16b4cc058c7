// src/handlers/employees.rs
//
// Rotas do admin do negócio: CRUD de empregados do próprio tenant.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminRole, RequireRole},
    models::{
        auth::{Role, User},
        business::CreateEmployeePayload,
    },
    services::auth::AuthService,
};

// POST /api/employees
pub async fn create_employee(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<AdminRole>,
    Json(payload): Json<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Admin sem negócio não tem onde pendurar o empregado.
    let business_id = admin.business_id.ok_or(AppError::BusinessNotFound)?;

    let password_hash = AuthService::hash_password(&payload.password).await?;
    let employee = app_state
        .user_repo
        .create_user(
            app_state.user_repo.pool(),
            &payload.name,
            &payload.email,
            &password_hash,
            Role::Employee,
            Some(business_id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

// GET /api/employees
pub async fn list_employees(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<AdminRole>,
) -> Result<Json<Vec<User>>, AppError> {
    let business_id = admin.business_id.ok_or(AppError::BusinessNotFound)?;

    let employees = app_state.user_repo.list_employees(Some(business_id)).await?;
    Ok(Json(employees))
}

// DELETE /api/employees/{employee_id}
pub async fn delete_employee(
    State(app_state): State<AppState>,
    RequireRole(admin, _): RequireRole<AdminRole>,
    Path(employee_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let business_id = admin.business_id.ok_or(AppError::BusinessNotFound)?;

    let deleted = app_state
        .user_repo
        .delete_employee(employee_id, Some(business_id))
        .await?;

    if deleted == 0 {
        return Err(AppError::UserNotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

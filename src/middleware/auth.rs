// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::marker::PhantomData;

use crate::{common::error::AppError, config::AppState, models::auth::{Role, User}};

// O middleware de autenticação: valida o Bearer token e pendura o
// usuário nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

/// O Trait que define qual papel a rota exige.
/// Substitui a velha checagem por string: o papel é um tipo, o extrator
/// é o guardião.
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

/// O Extractor (Guardião): `RequirePermission` dos papéis.
pub struct RequireRole<T>(pub User, pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if user.role != T::role() {
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(user, PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct SuperAdminRole;
impl RoleDef for SuperAdminRole {
    fn role() -> Role {
        Role::SuperAdmin
    }
}

pub struct AdminRole;
impl RoleDef for AdminRole {
    fn role() -> Role {
        Role::Admin
    }
}

pub struct EmployeeRole;
impl RoleDef for EmployeeRole {
    fn role() -> Role {
        Role::Employee
    }
}

// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As variantes de domínio (agenda/turno) viram 400/404/409; o resto vira 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Núcleo de agendamento ---
    #[error("O empregado não tem agenda nesse dia")]
    NoScheduleForDay,

    #[error("Serviço não encontrado")]
    ServiceNotFound,

    #[error("O turno está fora do horário da agenda")]
    OutOfHours,

    #[error("Esse horário já está ocupado")]
    SlotTaken,

    #[error("A agenda se sobrepõe a outra do mesmo dia")]
    OverlappingWindow,

    // --- Plumbing (auth / CRUD) ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Alias já está em uso")]
    AliasAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Negócio não encontrado")]
    BusinessNotFound,

    #[error("Turno não encontrado")]
    BookingNotFound,

    #[error("Agenda não encontrada")]
    WindowNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // Núcleo de agendamento: tudo erro do chamador.
            AppError::NoScheduleForDay => {
                (StatusCode::BAD_REQUEST, "O empregado não tem agenda nesse dia.")
            }
            AppError::OutOfHours => (
                StatusCode::BAD_REQUEST,
                "O turno está fora do horário disponível da agenda.",
            ),
            AppError::SlotTaken => (StatusCode::BAD_REQUEST, "Esse horário já está ocupado."),
            AppError::OverlappingWindow => (
                StatusCode::CONFLICT,
                "Já existe uma agenda que se sobrepõe nesse dia.",
            ),
            AppError::ServiceNotFound => (StatusCode::NOT_FOUND, "Serviço não encontrado."),

            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::AliasAlreadyExists => (StatusCode::CONFLICT, "Este alias já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Você não tem permissão para realizar esta ação.",
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::BusinessNotFound => (StatusCode::NOT_FOUND, "Negócio não encontrado."),
            AppError::BookingNotFound => (StatusCode::NOT_FOUND, "Turno não encontrado."),
            AppError::WindowNotFound => (StatusCode::NOT_FOUND, "Agenda não encontrada."),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

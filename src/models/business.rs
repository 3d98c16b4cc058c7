// src/models/business.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Um negócio (tenant): dono de empregados e serviços.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub alias: String,
    pub address: String,
    pub province: String,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Serviço oferecido por um empregado. A duração em minutos é o que
// determina o fim do turno na hora da reserva.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub duration_minutes: i32,
    pub business_id: Uuid,
    pub employee_id: Uuid,
}

// O super admin cria o negócio junto com o usuário admin dele,
// numa transação só (igual ao fluxo de provisionamento).
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(length(min = 2, message = "O alias deve ter no mínimo 2 caracteres."))]
    pub alias: String,
    #[validate(length(min = 1, message = "required"))]
    pub address: String,
    #[validate(length(min = 1, message = "required"))]
    pub province: String,

    #[validate(length(min = 2, message = "O nome do admin deve ter no mínimo 2 caracteres."))]
    pub admin_name: String,
    #[validate(email(message = "O e-mail do admin é inválido."))]
    pub admin_email: String,
    #[validate(length(min = 6, message = "A senha do admin deve ter no mínimo 6 caracteres."))]
    pub admin_password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessPayload {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 1, message = "required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 minuto."))]
    pub duration_minutes: i32,
    pub business_id: Uuid,
    pub employee_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicePayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 minuto."))]
    pub duration_minutes: Option<i32>,
}

// Update parcial de empregado: campo ausente mantém o valor atual.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
}

// Admin cria empregados dentro do próprio negócio.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

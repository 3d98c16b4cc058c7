// src/models/scheduling.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::intervals::Interval;

// --- AGENDA (janela de atendimento) ---

/// Janela declarada por um empregado para um dia específico.
/// O empregado só é reservável dentro de uma janela; janelas do mesmo
/// dia nunca se sobrepõem (validado na criação).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WorkingWindow {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_minutes: i32,
}

impl WorkingWindow {
    /// Combina dia + horas num intervalo completo de timestamps,
    /// comparável com os intervalos dos turnos.
    pub fn interval(&self) -> Interval {
        Interval::new(
            self.day.and_time(self.start_time),
            self.day.and_time(self.end_time),
        )
    }
}

/// Dados de uma janela ainda sem id (criação e substituição).
#[derive(Debug, Clone)]
pub struct NewWindow {
    pub employee_id: Uuid,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slot_minutes: i32,
}

impl NewWindow {
    pub fn interval(&self) -> Interval {
        Interval::new(
            self.day.and_time(self.start_time),
            self.day.and_time(self.end_time),
        )
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWindowPayload {
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[validate(range(min = 1, message = "A duração do slot deve ser de pelo menos 1 minuto."))]
    pub slot_minutes: i32,
}

// --- TURNO ---

// Mapeia o CREATE TYPE booking_status do banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Um turno reservado. `ends_at` é derivado na criação a partir da duração
/// do serviço e gravado junto: toda checagem de ocupação usa o intervalo
/// armazenado, nunca recalcula.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub payment_method: String,
    pub amount_paid: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn interval(&self) -> Interval {
        Interval::new(self.starts_at, self.ends_at)
    }

    /// Turnos cancelados não ocupam horário.
    pub fn occupies_slot(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Turno validado, pronto para persistir (sem id e sem client_id,
/// que o store resolve na mesma escrita).
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: NaiveDateTime,
    pub ends_at: NaiveDateTime,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub payment_method: String,
    pub amount_paid: Decimal,
    pub status: BookingStatus,
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Resultado da resolução de cliente no fluxo de reserva: ou já existe,
/// ou precisa ser inserido junto com o turno (na mesma transação).
#[derive(Debug, Clone)]
pub enum ClientRef {
    Existing(Uuid),
    New(NewClient),
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingPayload {
    pub employee_id: Uuid,
    pub service_id: Uuid,
    pub starts_at: NaiveDateTime,

    #[validate(length(min = 1, message = "required"))]
    pub client_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub client_email: Option<String>,
    pub client_phone: Option<String>,

    #[validate(length(min = 1, message = "required"))]
    pub payment_method: String,
    pub amount_paid: Decimal,

    // Se não vier, o turno nasce pendente.
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingStatusPayload {
    pub status: BookingStatus,
}

// Remarcação: só o início muda, a duração gravada é preservada.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBookingPayload {
    pub starts_at: NaiveDateTime,
}

// --- DISPONIBILIDADE ---

/// Um dia do horizonte com pelo menos um slot livre.
/// Os horários saem formatados como "HH:MM", em ordem crescente.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub times: Vec<String>,
}

// src/db/store.rs

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        business::Service,
        scheduling::{Booking, BookingStatus, Client, ClientRef, NewBooking, NewWindow, WorkingWindow},
    },
};

/// Interface de persistência consumida pelo núcleo de agendamento.
/// O cálculo de disponibilidade e a validação de reserva só conhecem
/// este trait; a implementação de produção é `PgScheduleStore` e os
/// testes usam um store em memória.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Janelas do empregado num dia exato, ordenadas por hora de início.
    async fn windows_for_day(
        &self,
        employee_id: Uuid,
        day: NaiveDate,
    ) -> Result<Vec<WorkingWindow>, AppError>;

    /// Todas as janelas do empregado, ordenadas por dia e hora.
    async fn windows_for_employee(
        &self,
        employee_id: Uuid,
    ) -> Result<Vec<WorkingWindow>, AppError>;

    async fn insert_window(&self, window: NewWindow) -> Result<WorkingWindow, AppError>;

    /// Substituição integral da janela (não há update parcial).
    /// `None` se a janela não existe ou não pertence ao empregado.
    async fn replace_window(
        &self,
        id: Uuid,
        employee_id: Uuid,
        window: NewWindow,
    ) -> Result<Option<WorkingWindow>, AppError>;

    /// Turnos do empregado cujo intervalo [starts_at, ends_at) cruza
    /// [from, to), em qualquer status, ordenados por início.
    async fn bookings_in_range(
        &self,
        employee_id: Uuid,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Booking>, AppError>;

    async fn find_service(&self, service_id: Uuid) -> Result<Option<Service>, AppError>;

    async fn find_client_by_email(&self, email: &str) -> Result<Option<Client>, AppError>;

    async fn find_client_by_phone(&self, phone: &str) -> Result<Option<Client>, AppError>;

    /// Escrita única do fluxo de reserva: insere o cliente (se `ClientRef::New`)
    /// e o turno na mesma transação. Ou grava tudo, ou nada.
    async fn persist_booking(
        &self,
        client: ClientRef,
        booking: NewBooking,
    ) -> Result<Booking, AppError>;

    /// Atualiza o status de um turno. Com `employee_scope`, só atinge turnos
    /// daquele empregado; `None` é o modo super admin. Reativar um turno
    /// cancelado reocupa o horário, então vale a mesma regra de
    /// não-sobreposição da inserção: conflito vira `SlotTaken`.
    async fn update_booking_status(
        &self,
        booking_id: Uuid,
        employee_scope: Option<Uuid>,
        status: BookingStatus,
    ) -> Result<Option<Booking>, AppError>;

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Move um turno para um intervalo já validado pelo chamador.
    /// Conflito com outro turno não-cancelado vira `SlotTaken`.
    async fn update_booking_time(
        &self,
        booking_id: Uuid,
        starts_at: NaiveDateTime,
        ends_at: NaiveDateTime,
    ) -> Result<Option<Booking>, AppError>;
}
